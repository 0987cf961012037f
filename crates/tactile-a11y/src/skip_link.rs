//! Skip link directive (`a11y-skip-link`)
//!
//! Turns the bound element into a "skip to content" link: clicking it
//! moves focus to the element matching the configured selector and
//! scrolls it into view. The target gets a `tabindex="-1"` when it has
//! none so focus can land on it.

use crate::binding::Binding;
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{Document, EventType, ListenerId, NodeId, ScrollBehavior, SelectorList};

struct SkipLinkState {
    listener: Option<ListenerId>,
    prev_role: Option<String>,
    prev_label: Option<String>,
    announced: bool,
}

/// `a11y-skip-link`
pub struct SkipLinkDirective;

impl Directive for SkipLinkDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        let Some(selector) = binding.value.as_str().map(str::to_string) else {
            return Box::new(SkipLinkState {
                listener: None,
                prev_role: None,
                prev_label: None,
                announced: false,
            });
        };

        let target_selector = SelectorList::parse(&selector);
        let listener = doc.add_listener(el, EventType::Click, false, move |doc, event| {
            event.prevent_default();
            let root = doc.root();
            let Some(target) = doc.query_selector(root, &target_selector) else {
                return;
            };
            if !doc.has_attribute(target, "tabindex") {
                doc.set_attribute(target, "tabindex", "-1");
            }
            doc.focus(target);
            doc.scroll_into_view(target, ScrollBehavior::Smooth);
        });

        let prev_role = doc.attribute(el, "role").map(str::to_string);
        let prev_label = doc.attribute(el, "aria-label").map(str::to_string);
        doc.set_attribute(el, "role", "link");
        let label = format!("Skip to {}", selector.trim_start_matches('#'));
        doc.set_attribute(el, "aria-label", &label);

        Box::new(SkipLinkState {
            listener: Some(listener),
            prev_role,
            prev_label,
            announced: true,
        })
    }

    fn unmounted(&self, doc: &mut Document, el: NodeId, state: DirectiveState) {
        let Ok(state) = state.downcast::<SkipLinkState>() else {
            return;
        };
        if let Some(listener) = state.listener {
            doc.remove_listener(listener);
        }
        if state.announced && doc.is_attached(el) {
            match state.prev_role {
                Some(role) => doc.set_attribute(el, "role", &role),
                None => {
                    doc.remove_attribute(el, "role");
                }
            }
            match state.prev_label {
                Some(label) => doc.set_attribute(el, "aria-label", &label),
                None => {
                    doc.remove_attribute(el, "aria-label");
                }
            }
        }
    }
}
