//! Directive registry
//!
//! Directives attach behavior to elements through a mount / update /
//! unmount lifecycle. Per-element state lives here in a side table
//! keyed by element and directive name, never on the nodes themselves.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::binding::Binding;
use crate::A11yError;
use tactile_dom::{Document, NodeId};

/// Opaque per-mount state a directive carries between lifecycle calls
pub type DirectiveState = Box<dyn Any>;

/// Element-level behavior with a mount / update / unmount lifecycle
pub trait Directive {
    /// Called when the directive is attached to an element.
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState;

    /// Called when the bound value changes.
    fn updated(
        &self,
        _doc: &mut Document,
        _el: NodeId,
        _binding: &Binding,
        _state: &mut DirectiveState,
    ) {
    }

    /// Called when the directive is detached. Consumes the state.
    fn unmounted(&self, _doc: &mut Document, _el: NodeId, _state: DirectiveState) {}
}

/// Holds registered directives and the state of every active mount
#[derive(Default)]
pub struct DirectiveRegistry {
    directives: HashMap<String, Rc<dyn Directive>>,
    states: HashMap<(NodeId, String), DirectiveState>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directive under a name, replacing any previous one.
    pub fn register(&mut self, name: &str, directive: Rc<dyn Directive>) {
        self.directives.insert(name.to_string(), directive);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Attach a directive to an element.
    pub fn mount(
        &mut self,
        doc: &mut Document,
        el: NodeId,
        name: &str,
        binding: &Binding,
    ) -> Result<(), A11yError> {
        let directive = self
            .directives
            .get(name)
            .cloned()
            .ok_or_else(|| A11yError::UnknownDirective(name.to_string()))?;
        let key = (el, name.to_string());
        if self.states.contains_key(&key) {
            return Err(A11yError::AlreadyMounted(name.to_string()));
        }
        let state = directive.mounted(doc, el, binding);
        self.states.insert(key, state);
        Ok(())
    }

    /// Re-evaluate a mounted directive with a new binding.
    pub fn update(
        &mut self,
        doc: &mut Document,
        el: NodeId,
        name: &str,
        binding: &Binding,
    ) -> Result<(), A11yError> {
        let directive = self
            .directives
            .get(name)
            .cloned()
            .ok_or_else(|| A11yError::UnknownDirective(name.to_string()))?;
        let state = self
            .states
            .get_mut(&(el, name.to_string()))
            .ok_or_else(|| A11yError::NotMounted(name.to_string()))?;
        directive.updated(doc, el, binding, state);
        Ok(())
    }

    /// Detach a directive from an element, running its cleanup.
    pub fn unmount(&mut self, doc: &mut Document, el: NodeId, name: &str) -> Result<(), A11yError> {
        let directive = self
            .directives
            .get(name)
            .cloned()
            .ok_or_else(|| A11yError::UnknownDirective(name.to_string()))?;
        let state = self
            .states
            .remove(&(el, name.to_string()))
            .ok_or_else(|| A11yError::NotMounted(name.to_string()))?;
        directive.unmounted(doc, el, state);
        Ok(())
    }

    /// Detach every directive mounted on an element. Used when the
    /// element itself is torn down.
    pub fn unmount_all(&mut self, doc: &mut Document, el: NodeId) {
        let names: Vec<String> = self
            .states
            .keys()
            .filter(|(node, _)| *node == el)
            .map(|(_, name)| name.clone())
            .collect();
        for name in names {
            if let Some(state) = self.states.remove(&(el, name.clone())) {
                if let Some(directive) = self.directives.get(&name).cloned() {
                    directive.unmounted(doc, el, state);
                }
            }
        }
    }
}

/// Registry with the full directive set under their standard names
pub fn install() -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    registry.register("a11y-focus", Rc::new(crate::focus::FocusDirective));
    registry.register("a11y-trap-focus", Rc::new(crate::trap_focus::TrapFocusDirective));
    registry.register("a11y-keyboard", Rc::new(crate::keyboard::KeyboardDirective));
    registry.register("a11y-announce", Rc::new(crate::announce::AnnounceDirective));
    registry.register("a11y-skip-link", Rc::new(crate::skip_link::SkipLinkDirective));
    registry.register("a11y-skip", Rc::new(crate::skip::SkipDirective));
    registry.register("a11y-aria", Rc::new(crate::aria::AriaDirective));
    registry.register("a11y-date-picker", Rc::new(crate::date_picker::DatePickerDirective));
    registry
}
