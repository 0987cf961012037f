//! Input events
//!
//! Key and click events with capture/bubble dispatch semantics.

use crate::NodeId;

/// Event types the host dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    Click,
}

/// A key on the keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Delete,
    Backspace,
    /// A printable character key
    Char(char),
    /// Any other named key ("Home", "F5", ...)
    Named(String),
}

impl Key {
    /// The DOM `event.key` string for this key
    pub fn raw(&self) -> String {
        match self {
            Self::Enter => "Enter".to_string(),
            Self::Space => " ".to_string(),
            Self::Escape => "Escape".to_string(),
            Self::ArrowUp => "ArrowUp".to_string(),
            Self::ArrowDown => "ArrowDown".to_string(),
            Self::ArrowLeft => "ArrowLeft".to_string(),
            Self::ArrowRight => "ArrowRight".to_string(),
            Self::Tab => "Tab".to_string(),
            Self::Delete => "Delete".to_string(),
            Self::Backspace => "Backspace".to_string(),
            Self::Char(c) => c.to_string(),
            Self::Named(name) => name.clone(),
        }
    }

    /// Whether this is one of the four arrow keys
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Self::ArrowUp | Self::ArrowDown | Self::ArrowLeft | Self::ArrowRight
        )
    }
}

/// A key press with modifier state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Modifier-prefixed combination string: `ctrl+`/`alt+`/`shift+`
    /// followed by the lowercased key. Meta counts as ctrl.
    pub fn combo(&self) -> String {
        let mut combo = String::new();
        if self.ctrl || self.meta {
            combo.push_str("ctrl+");
        }
        if self.alt {
            combo.push_str("alt+");
        }
        if self.shift {
            combo.push_str("shift+");
        }
        combo.push_str(&self.key.raw().to_lowercase());
        combo
    }
}

/// Dispatched event
#[derive(Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    key: Option<KeyInput>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create a keydown event
    pub fn key_down(target: NodeId, key: KeyInput) -> Self {
        Self {
            event_type: EventType::KeyDown,
            target,
            current_target: None,
            key: Some(key),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a click event
    pub fn click(target: NodeId) -> Self {
        Self {
            event_type: EventType::Click,
            target,
            current_target: None,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Key payload for keydown events
    pub fn key(&self) -> Option<&KeyInput> {
        self.key.as_ref()
    }

    /// Prevent the default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation to further nodes on the path
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Handle to a registered event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
