//! ARIA directive (`a11y-aria`)
//!
//! Applies a batch of ARIA attributes from shorthand property names.
//! On value change the previously applied set is fully removed before
//! the new set is applied: a replace, never a merge.

use crate::binding::{Binding, Value};
use crate::helpers::remove_attributes;
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{Document, NodeId};

/// Shorthand property name to ARIA attribute name
const SHORTHAND: &[(&str, &str)] = &[
    ("label", "aria-label"),
    ("labelledby", "aria-labelledby"),
    ("describedby", "aria-describedby"),
    ("expanded", "aria-expanded"),
    ("pressed", "aria-pressed"),
    ("selected", "aria-selected"),
    ("checked", "aria-checked"),
    ("disabled", "aria-disabled"),
    ("hidden", "aria-hidden"),
    ("invalid", "aria-invalid"),
    ("required", "aria-required"),
    ("live", "aria-live"),
    ("atomic", "aria-atomic"),
    ("busy", "aria-busy"),
    ("controls", "aria-controls"),
    ("owns", "aria-owns"),
    ("haspopup", "aria-haspopup"),
    ("level", "aria-level"),
    ("modal", "aria-modal"),
    ("multiselectable", "aria-multiselectable"),
    ("orientation", "aria-orientation"),
    ("placeholder", "aria-placeholder"),
    ("readonly", "aria-readonly"),
    ("relevant", "aria-relevant"),
    ("valuemax", "aria-valuemax"),
    ("valuemin", "aria-valuemin"),
    ("valuenow", "aria-valuenow"),
    ("valuetext", "aria-valuetext"),
];

/// Resolve a shorthand key to its ARIA attribute name; unrecognized
/// keys pass through as literal attribute names.
pub fn aria_attribute_name(key: &str) -> &str {
    SHORTHAND
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, full)| *full)
        .unwrap_or(key)
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(n) => Some(n.to_string()),
        Value::Str(s) => Some(s.clone()),
        Value::Missing | Value::Handler(_) | Value::Map(_) => None,
    }
}

fn apply(doc: &mut Document, el: NodeId, value: &Value) -> Vec<String> {
    let mut applied = Vec::new();
    for (key, entry) in value.entries() {
        let Some(text) = stringify(entry) else {
            continue;
        };
        let name = aria_attribute_name(key).to_string();
        doc.set_attribute(el, &name, &text);
        applied.push(name);
    }
    applied
}

struct AriaState {
    applied: Vec<String>,
}

/// `a11y-aria`
pub struct AriaDirective;

impl Directive for AriaDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        Box::new(AriaState {
            applied: apply(doc, el, &binding.value),
        })
    }

    fn updated(
        &self,
        doc: &mut Document,
        el: NodeId,
        binding: &Binding,
        state: &mut DirectiveState,
    ) {
        let Some(state) = state.downcast_mut::<AriaState>() else {
            return;
        };
        if !binding.changed() {
            return;
        }
        remove_attributes(doc, el, &state.applied);
        state.applied = apply(doc, el, &binding.value);
    }

    fn unmounted(&self, doc: &mut Document, el: NodeId, state: DirectiveState) {
        if let Ok(state) = state.downcast::<AriaState>() {
            remove_attributes(doc, el, &state.applied);
        }
    }
}
