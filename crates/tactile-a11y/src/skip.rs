//! Skip directive (`a11y-skip`)
//!
//! Removes an element and its interactive descendants from keyboard
//! navigation and the accessibility tree while a condition holds, and
//! restores their exact prior state when it stops holding. Used for
//! decorative duplicates and temporarily inert regions.

use std::collections::HashMap;

use crate::binding::Binding;
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{Document, NodeId};

/// Marker attribute for CSS targeting of skipped elements
const DATA_SKIP: &str = "data-a11y-skip";

/// `.no-interaction` also blocks pointer interaction
const MOD_NO_INTERACTION: &str = "no-interaction";
/// `.visual` dims and desaturates the element
const MOD_VISUAL: &str = "visual";

struct OwnSnapshot {
    tabindex: Option<String>,
    aria_hidden: Option<String>,
}

struct ChildSnapshot {
    tabindex: Option<String>,
    disabled: Option<String>,
}

#[derive(Default)]
struct SkipState {
    skipped: bool,
    own: Option<OwnSnapshot>,
    children: HashMap<NodeId, ChildSnapshot>,
    no_interaction: bool,
    visual: bool,
}

fn restore_attr(doc: &mut Document, el: NodeId, name: &str, saved: Option<String>) {
    match saved {
        Some(value) => doc.set_attribute(el, name, &value),
        None => {
            doc.remove_attribute(el, name);
        }
    }
}

/// Descendants that can take part in keyboard interaction
fn interactive_descendants(doc: &Document, el: NodeId) -> Vec<NodeId> {
    doc.tree()
        .descendants(el)
        .into_iter()
        .filter(|&id| id != el)
        .filter(|&id| {
            doc.element(id).is_some_and(|element| {
                matches!(
                    element.name.as_str(),
                    "a" | "button" | "input" | "select" | "textarea"
                ) || element.has_attr("tabindex")
            })
        })
        .collect()
}

fn apply_skip(doc: &mut Document, el: NodeId, state: &mut SkipState) {
    if state.own.is_none() {
        state.own = Some(OwnSnapshot {
            tabindex: doc.attribute(el, "tabindex").map(str::to_string),
            aria_hidden: doc.attribute(el, "aria-hidden").map(str::to_string),
        });
    }
    doc.set_attribute(el, "tabindex", "-1");
    doc.set_attribute(el, "aria-hidden", "true");
    doc.set_attribute(el, DATA_SKIP, "true");

    for child in interactive_descendants(doc, el) {
        if !state.children.contains_key(&child) {
            state.children.insert(
                child,
                ChildSnapshot {
                    tabindex: doc.attribute(child, "tabindex").map(str::to_string),
                    disabled: doc.attribute(child, "disabled").map(str::to_string),
                },
            );
        }
        doc.set_attribute(child, "tabindex", "-1");
        let form_control = doc.element(child).is_some_and(|e| e.is_form_control());
        if form_control {
            doc.set_attribute(child, "disabled", "");
        }
    }

    if state.no_interaction {
        doc.set_style(el, "pointer-events", "none");
    }
    if state.visual {
        doc.set_style(el, "opacity", "0.5");
        doc.set_style(el, "filter", "grayscale(100%)");
        doc.set_style(el, "pointer-events", "none");
    }
    state.skipped = true;
}

fn restore(doc: &mut Document, el: NodeId, state: &mut SkipState) {
    if let Some(own) = state.own.take() {
        restore_attr(doc, el, "tabindex", own.tabindex);
        restore_attr(doc, el, "aria-hidden", own.aria_hidden);
    }
    doc.remove_attribute(el, DATA_SKIP);

    // Detached children are restored too: they may be reinserted and
    // must not come back carrying the skip-era attributes.
    for (child, snapshot) in state.children.drain() {
        restore_attr(doc, child, "tabindex", snapshot.tabindex);
        restore_attr(doc, child, "disabled", snapshot.disabled);
    }

    if state.no_interaction {
        doc.remove_style(el, "pointer-events");
    }
    if state.visual {
        doc.remove_style(el, "opacity");
        doc.remove_style(el, "filter");
        doc.remove_style(el, "pointer-events");
    }
    state.skipped = false;
}

/// `a11y-skip`
pub struct SkipDirective;

impl SkipDirective {
    fn sync(&self, doc: &mut Document, el: NodeId, binding: &Binding, state: &mut SkipState) {
        state.no_interaction = binding.has_modifier(MOD_NO_INTERACTION);
        state.visual = binding.has_modifier(MOD_VISUAL);
        if binding.value.is_truthy() {
            apply_skip(doc, el, state);
        } else if state.skipped {
            restore(doc, el, state);
        }
    }
}

impl Directive for SkipDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        let mut state = SkipState::default();
        self.sync(doc, el, binding, &mut state);
        Box::new(state)
    }

    fn updated(
        &self,
        doc: &mut Document,
        el: NodeId,
        binding: &Binding,
        state: &mut DirectiveState,
    ) {
        if let Some(state) = state.downcast_mut::<SkipState>() {
            self.sync(doc, el, binding, state);
        }
    }

    fn unmounted(&self, doc: &mut Document, el: NodeId, state: DirectiveState) {
        let Ok(mut state) = state.downcast::<SkipState>() else {
            return;
        };
        if state.skipped {
            restore(doc, el, &mut state);
        }
    }
}
