//! Focus directive (`a11y-focus`)
//!
//! Auto-focus the bound element, optionally after a delay, optionally
//! selecting its text content. Elements that cannot natively take
//! focus get a temporary negative tabindex so focus can land, removed
//! again on unmount.

use crate::binding::{Binding, Value};
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{is_natively_focusable, Document, NodeId, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FocusConfig {
    delay: u64,
    select: bool,
}

impl FocusConfig {
    fn parse(value: &Value) -> Self {
        match value {
            Value::Int(n) => Self {
                delay: (*n).max(0) as u64,
                select: false,
            },
            Value::Map(_) => Self {
                delay: value
                    .get("delay")
                    .and_then(Value::as_int)
                    .map(|n| n.max(0) as u64)
                    .unwrap_or(0),
                select: value
                    .get("select")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            _ => Self {
                delay: 0,
                select: false,
            },
        }
    }
}

#[derive(Default)]
struct FocusState {
    timer: Option<TimerId>,
    temp_tabindex: bool,
}

/// `a11y-focus`
pub struct FocusDirective;

impl Directive for FocusDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        let mut state = FocusState::default();
        let Some(element) = doc.element(el) else {
            return Box::new(state); // missing element: no-op
        };

        let config = FocusConfig::parse(&binding.value);
        if !is_natively_focusable(element) && !element.has_attr("tabindex") {
            doc.set_attribute(el, "tabindex", "-1");
            state.temp_tabindex = true;
        }

        let select = config.select;
        state.timer = Some(doc.schedule(config.delay, move |doc| {
            if doc.focus(el)
                && select
                && matches!(doc.tag_name(el), Some("input") | Some("textarea"))
            {
                doc.select_contents(el);
            }
        }));
        Box::new(state)
    }

    fn unmounted(&self, doc: &mut Document, el: NodeId, state: DirectiveState) {
        let Ok(state) = state.downcast::<FocusState>() else {
            return;
        };
        if let Some(timer) = state.timer {
            doc.cancel_timer(timer);
        }
        if state.temp_tabindex {
            doc.remove_attribute(el, "tabindex");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(tag: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let el = doc.create_element(tag);
        doc.append_child(doc.body(), el);
        (doc, el)
    }

    #[test]
    fn test_immediate_focus() {
        let (mut doc, el) = setup("input");
        FocusDirective.mounted(&mut doc, el, &Binding::missing());

        assert_eq!(doc.active_element(), None);
        doc.run_pending();
        assert_eq!(doc.active_element(), Some(el));
    }

    #[test]
    fn test_delayed_focus() {
        let (mut doc, el) = setup("input");
        FocusDirective.mounted(&mut doc, el, &Binding::new(Value::from(200_i64)));

        doc.advance(150);
        assert_eq!(doc.active_element(), None);
        doc.advance(50);
        assert_eq!(doc.active_element(), Some(el));
    }

    #[test]
    fn test_select_text() {
        let (mut doc, el) = setup("textarea");
        let value = Value::map([("delay", Value::from(0_i64)), ("select", Value::from(true))]);
        FocusDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.run_pending();
        assert_eq!(doc.selection_requests(), &[el]);
    }

    #[test]
    fn test_select_ignored_for_non_text_elements() {
        let (mut doc, el) = setup("button");
        let value = Value::map([("select", Value::from(true))]);
        FocusDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.run_pending();
        assert_eq!(doc.active_element(), Some(el));
        assert!(doc.selection_requests().is_empty());
    }

    #[test]
    fn test_temporary_tabindex_roundtrip() {
        let (mut doc, el) = setup("div");
        let state = FocusDirective.mounted(&mut doc, el, &Binding::missing());

        assert_eq!(doc.attribute(el, "tabindex"), Some("-1"));
        doc.run_pending();
        assert_eq!(doc.active_element(), Some(el));

        FocusDirective.unmounted(&mut doc, el, state);
        assert!(!doc.has_attribute(el, "tabindex"));
    }

    #[test]
    fn test_unmount_cancels_pending_focus() {
        let (mut doc, el) = setup("input");
        let state = FocusDirective.mounted(&mut doc, el, &Binding::new(Value::from(500_i64)));

        FocusDirective.unmounted(&mut doc, el, state);
        doc.advance(1000);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_existing_tabindex_preserved() {
        let (mut doc, el) = setup("div");
        doc.set_attribute(el, "tabindex", "0");
        let state = FocusDirective.mounted(&mut doc, el, &Binding::missing());

        FocusDirective.unmounted(&mut doc, el, state);
        // Not ours: must survive unmount.
        assert_eq!(doc.attribute(el, "tabindex"), Some("0"));
    }
}
