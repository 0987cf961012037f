//! Directive bindings
//!
//! The value a host framework binds to a directive: either a primitive
//! shorthand or a structured configuration map, plus attach-time
//! modifiers. Directives validate a binding into a typed config once at
//! mount/update; nothing branches on value shape at use sites.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use tactile_dom::{Document, Event};

type HandlerFn = Rc<RefCell<dyn FnMut(&mut Document, &Event)>>;

/// A user-supplied callback bound into a directive configuration.
/// Equality is identity: two handlers are equal only if they are the
/// same closure.
#[derive(Clone)]
pub struct Handler(HandlerFn);

impl Handler {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&mut Document, &Event) + 'static,
    {
        Self(Rc::new(RefCell::new(callback)))
    }

    /// Invoke the callback
    pub fn call(&self, doc: &mut Document, event: &Event) {
        (self.0.borrow_mut())(doc, event);
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}

/// A bound directive value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Directive used with no value at all
    #[default]
    Missing,
    Bool(bool),
    Int(i64),
    Str(String),
    Handler(Handler),
    /// Structured configuration object, entries in declaration order
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Build a map value from entries
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Self::Handler(h) => Some(h),
            _ => None,
        }
    }

    /// Look up a key in a map value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Map entries, or empty for non-map values
    pub fn entries(&self) -> &[(String, Value)] {
        match self {
            Self::Map(entries) => entries,
            _ => &[],
        }
    }

    /// Truthiness mirroring the host-framework convention: missing is
    /// true (bare directive usage means "on"), empty strings and zero
    /// are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Str(s) => !s.is_empty(),
            Self::Handler(_) | Self::Map(_) => true,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Handler> for Value {
    fn from(h: Handler) -> Self {
        Self::Handler(h)
    }
}

/// A directive binding: current value, previous value (on update), and
/// attach-time modifiers.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    pub value: Value,
    pub old_value: Option<Value>,
    pub modifiers: BTreeSet<String>,
}

impl Binding {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            old_value: None,
            modifiers: BTreeSet::new(),
        }
    }

    /// Binding with no value
    pub fn missing() -> Self {
        Self::new(Value::Missing)
    }

    pub fn with_old_value(mut self, old: Value) -> Self {
        self.old_value = Some(old);
        self
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifiers.insert(modifier.to_string());
        self
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Whether the value differs from the previous one. A binding with
    /// no recorded previous value counts as changed.
    pub fn changed(&self) -> bool {
        match &self.old_value {
            Some(old) => *old != self.value,
            None => true,
        }
    }
}
