//! Focus trap directive (`a11y-trap-focus`)
//!
//! Keeps keyboard focus cycling within the bound container: Tab from
//! the last focusable wraps to the first and Shift+Tab from the first
//! wraps to the last. Escape invokes the configured handler. On
//! unmount, focus returns to the element that held it before the trap
//! mounted.

use crate::binding::{Binding, Handler, Value};
use crate::helpers::{restore_focus, save_focus};
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{
    first_focusable, focusable_descendants, last_focusable, Document, EventType, Key, ListenerId,
    NodeId, TimerId,
};

const AUTO_FOCUS_DELAY_MS: u64 = 100;

#[derive(Debug)]
struct TrapConfig {
    auto_focus: bool,
    on_escape: Option<Handler>,
}

impl TrapConfig {
    fn parse(value: &Value) -> Self {
        Self {
            auto_focus: value
                .get("autoFocus")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            on_escape: value.get("onEscape").and_then(Value::as_handler).cloned(),
        }
    }
}

struct TrapState {
    previous: Option<NodeId>,
    key_listener: ListenerId,
    escape_listener: Option<ListenerId>,
    autofocus_timer: Option<TimerId>,
}

/// `a11y-trap-focus`
pub struct TrapFocusDirective;

impl Directive for TrapFocusDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        let config = TrapConfig::parse(&binding.value);
        let previous = save_focus(doc);

        // Focusable set is recomputed per keystroke so elements added
        // or disabled after mount are still trapped correctly.
        let key_listener = doc.add_listener(el, EventType::KeyDown, false, move |doc, event| {
            if event.key().map(|k| &k.key) != Some(&Key::Tab) {
                return;
            }
            let focusables = focusable_descendants(doc, el);
            if focusables.is_empty() {
                event.prevent_default();
                return;
            }
            let shift = event.key().map(|k| k.shift).unwrap_or(false);
            let active = doc.active_element();
            if shift && active == first_focusable(doc, el) {
                event.prevent_default();
                if let Some(last) = last_focusable(doc, el) {
                    doc.focus(last);
                }
            } else if !shift && active == last_focusable(doc, el) {
                event.prevent_default();
                if let Some(first) = first_focusable(doc, el) {
                    doc.focus(first);
                }
            }
        });

        let escape_listener = config.on_escape.map(|handler| {
            let root = doc.root();
            doc.add_listener(root, EventType::KeyDown, true, move |doc, event| {
                if event.key().map(|k| &k.key) == Some(&Key::Escape) {
                    event.prevent_default();
                    event.stop_propagation();
                    handler.call(doc, event);
                }
            })
        });

        let autofocus_timer = config.auto_focus.then(|| {
            doc.schedule(AUTO_FOCUS_DELAY_MS, move |doc| {
                if let Some(first) = first_focusable(doc, el) {
                    doc.focus(first);
                }
            })
        });

        Box::new(TrapState {
            previous,
            key_listener,
            escape_listener,
            autofocus_timer,
        })
    }

    fn unmounted(&self, doc: &mut Document, _el: NodeId, state: DirectiveState) {
        let Ok(state) = state.downcast::<TrapState>() else {
            return;
        };
        doc.remove_listener(state.key_listener);
        if let Some(listener) = state.escape_listener {
            doc.remove_listener(listener);
        }
        if let Some(timer) = state.autofocus_timer {
            doc.cancel_timer(timer);
        }
        // Deferred so the container teardown finishes before focus moves.
        let previous = state.previous;
        doc.schedule(0, move |doc| restore_focus(doc, previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tactile_dom::KeyInput;

    fn dialog_with_buttons(doc: &mut Document, count: usize) -> (NodeId, Vec<NodeId>) {
        let dialog = doc.create_element("div");
        doc.append_child(doc.body(), dialog);
        let buttons = (0..count)
            .map(|_| {
                let b = doc.create_element("button");
                doc.append_child(dialog, b);
                b
            })
            .collect();
        (dialog, buttons)
    }

    fn press_tab(doc: &mut Document, target: NodeId, shift: bool) {
        let mut input = KeyInput::new(Key::Tab);
        if shift {
            input = input.with_shift();
        }
        doc.key_down(target, input);
    }

    #[test]
    fn test_tab_wraps_from_last_to_first() {
        let mut doc = Document::new();
        let (dialog, buttons) = dialog_with_buttons(&mut doc, 3);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());

        doc.focus(buttons[2]);
        press_tab(&mut doc, buttons[2], false);
        assert_eq!(doc.active_element(), Some(buttons[0]));
    }

    #[test]
    fn test_shift_tab_wraps_from_first_to_last() {
        let mut doc = Document::new();
        let (dialog, buttons) = dialog_with_buttons(&mut doc, 3);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());

        doc.focus(buttons[0]);
        press_tab(&mut doc, buttons[0], true);
        assert_eq!(doc.active_element(), Some(buttons[2]));
    }

    #[test]
    fn test_tab_in_the_middle_is_untouched() {
        let mut doc = Document::new();
        let (dialog, buttons) = dialog_with_buttons(&mut doc, 3);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());

        doc.focus(buttons[1]);
        press_tab(&mut doc, buttons[1], false);
        // No wrap from the middle: the browser advances focus itself.
        assert_eq!(doc.active_element(), Some(buttons[1]));
    }

    #[test]
    fn test_auto_focus_after_delay() {
        let mut doc = Document::new();
        let (dialog, buttons) = dialog_with_buttons(&mut doc, 2);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());

        assert_eq!(doc.active_element(), None);
        doc.advance(AUTO_FOCUS_DELAY_MS);
        assert_eq!(doc.active_element(), Some(buttons[0]));
    }

    #[test]
    fn test_auto_focus_opt_out() {
        let mut doc = Document::new();
        let (dialog, _) = dialog_with_buttons(&mut doc, 2);
        let value = Value::map([("autoFocus", Value::from(false))]);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::new(value));

        doc.advance(AUTO_FOCUS_DELAY_MS);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_escape_invokes_handler() {
        let mut doc = Document::new();
        let (dialog, buttons) = dialog_with_buttons(&mut doc, 1);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let value = Value::map([(
            "onEscape",
            Value::Handler(Handler::new(move |_, _| flag.set(true))),
        )]);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::new(value));

        doc.key_down(buttons[0], KeyInput::new(Key::Escape));
        assert!(fired.get());
    }

    #[test]
    fn test_focus_restored_on_unmount() {
        let mut doc = Document::new();
        let opener = doc.create_element("button");
        doc.append_child(doc.body(), opener);
        doc.focus(opener);

        let (dialog, buttons) = dialog_with_buttons(&mut doc, 2);
        let state = TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());
        doc.focus(buttons[0]);

        TrapFocusDirective.unmounted(&mut doc, dialog, state);
        doc.run_pending();
        assert_eq!(doc.active_element(), Some(opener));
    }

    #[test]
    fn test_unmount_cancels_pending_auto_focus() {
        let mut doc = Document::new();
        let opener = doc.create_element("button");
        doc.append_child(doc.body(), opener);
        doc.focus(opener);

        let (dialog, buttons) = dialog_with_buttons(&mut doc, 2);
        let state = TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());
        // Torn down before the auto-focus delay elapses.
        TrapFocusDirective.unmounted(&mut doc, dialog, state);

        doc.advance(AUTO_FOCUS_DELAY_MS);
        assert_ne!(doc.active_element(), Some(buttons[0]));
        assert_eq!(doc.active_element(), Some(opener));
    }

    #[test]
    fn test_trap_tracks_dynamic_content() {
        let mut doc = Document::new();
        let (dialog, buttons) = dialog_with_buttons(&mut doc, 2);
        TrapFocusDirective.mounted(&mut doc, dialog, &Binding::missing());

        let extra = doc.create_element("button");
        doc.append_child(dialog, extra);

        doc.focus(extra);
        press_tab(&mut doc, extra, false);
        assert_eq!(doc.active_element(), Some(buttons[0]));
    }
}
