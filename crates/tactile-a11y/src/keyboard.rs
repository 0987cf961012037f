//! Keyboard directive (`a11y-keyboard`)
//!
//! Routes keydown events on the bound element to configured handlers.
//! Handlers can be keyed by friendly slot names (`enter`, `arrowUp`),
//! modifier combinations (`ctrl+s`), raw key strings, a catch-all
//! `arrows` handler, a nested `handlers` map, or a `custom` fallback
//! that sees everything unmatched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::binding::{Binding, Handler, Value};
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{Document, Event, EventType, Key, KeyInput, ListenerId, NodeId};

/// Friendly names for the keys most configs bind
const NAMED_SLOTS: &[&str] = &[
    "enter",
    "space",
    "escape",
    "arrowUp",
    "arrowDown",
    "arrowLeft",
    "arrowRight",
    "tab",
    "delete",
    "backspace",
];

fn named_slot(key: &Key) -> Option<&'static str> {
    Some(match key {
        Key::Enter => "enter",
        Key::Space => "space",
        Key::Escape => "escape",
        Key::ArrowUp => "arrowUp",
        Key::ArrowDown => "arrowDown",
        Key::ArrowLeft => "arrowLeft",
        Key::ArrowRight => "arrowRight",
        Key::Tab => "tab",
        Key::Delete => "delete",
        Key::Backspace => "backspace",
        _ => return None,
    })
}

#[derive(Default)]
struct KeyboardConfig {
    /// Handlers under friendly slot names
    named: HashMap<String, Handler>,
    /// Handlers under combination or raw key strings
    keyed: HashMap<String, Handler>,
    /// Catch-all for the four arrow keys
    arrows: Option<Handler>,
    /// Nested `handlers` map, checked by raw key then combination
    nested: HashMap<String, Handler>,
    /// Fallback that receives every unmatched key, without
    /// preventing the default action
    custom: Option<Handler>,
    /// `enter: true` shorthand: Enter clicks the element
    legacy_enter: bool,
    /// `space: true` shorthand: Space clicks buttons and links
    legacy_space: bool,
}

impl KeyboardConfig {
    fn parse(value: &Value) -> Self {
        let mut config = Self::default();
        for (name, entry) in value.entries() {
            match (name.as_str(), entry) {
                ("arrows", Value::Handler(h)) => config.arrows = Some(h.clone()),
                ("custom", Value::Handler(h)) => config.custom = Some(h.clone()),
                ("handlers", nested @ Value::Map(_)) => {
                    for (key, entry) in nested.entries() {
                        if let Value::Handler(h) = entry {
                            config.nested.insert(key.clone(), h.clone());
                        }
                    }
                }
                ("enter", Value::Bool(true)) => config.legacy_enter = true,
                ("space", Value::Bool(true)) => config.legacy_space = true,
                (slot, Value::Handler(h)) if NAMED_SLOTS.contains(&slot) => {
                    config.named.insert(slot.to_string(), h.clone());
                }
                (_, Value::Handler(h)) => {
                    config.keyed.insert(name.clone(), h.clone());
                }
                _ => {}
            }
        }
        config
    }

    /// Resolve a key press to a handler. The bool is whether the
    /// default action gets prevented before the handler runs.
    fn resolve(&self, input: &KeyInput) -> Option<(Handler, bool)> {
        let raw = input.key.raw();
        let combo = input.combo();
        if let Some(handler) = named_slot(&input.key).and_then(|slot| self.named.get(slot)) {
            return Some((handler.clone(), true));
        }
        if let Some(handler) = self.keyed.get(&combo) {
            return Some((handler.clone(), true));
        }
        if let Some(handler) = self.keyed.get(&raw) {
            return Some((handler.clone(), true));
        }
        if input.key.is_arrow() {
            if let Some(handler) = &self.arrows {
                return Some((handler.clone(), true));
            }
        }
        if let Some(handler) = self.nested.get(&raw).or_else(|| self.nested.get(&combo)) {
            return Some((handler.clone(), true));
        }
        self.custom.clone().map(|handler| (handler, false))
    }
}

struct KeyboardState {
    listener: ListenerId,
    config: Rc<RefCell<KeyboardConfig>>,
}

fn run_legacy(
    doc: &mut Document,
    el: NodeId,
    config: &Rc<RefCell<KeyboardConfig>>,
    input: &KeyInput,
    event: &mut Event,
) {
    let (legacy_enter, legacy_space) = {
        let config = config.borrow();
        (config.legacy_enter, config.legacy_space)
    };
    if legacy_enter
        && input.key == Key::Enter
        && !matches!(
            doc.tag_name(event.target),
            Some("input") | Some("textarea") | Some("select")
        )
    {
        event.prevent_default();
        doc.click(el);
    }
    if legacy_space
        && input.key == Key::Space
        && matches!(doc.tag_name(el), Some("button") | Some("a"))
    {
        event.prevent_default();
        doc.click(el);
    }
}

/// `a11y-keyboard`
pub struct KeyboardDirective;

impl Directive for KeyboardDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        let config = Rc::new(RefCell::new(KeyboardConfig::parse(&binding.value)));
        let shared = config.clone();
        let listener = doc.add_listener(el, EventType::KeyDown, false, move |doc, event| {
            let Some(input) = event.key().cloned() else {
                return;
            };
            let resolved = shared.borrow().resolve(&input);
            match resolved {
                Some((handler, prevent)) => {
                    if prevent {
                        event.prevent_default();
                    }
                    handler.call(doc, event);
                }
                None => run_legacy(doc, el, &shared, &input, event),
            }
        });
        Box::new(KeyboardState { listener, config })
    }

    fn updated(
        &self,
        _doc: &mut Document,
        _el: NodeId,
        binding: &Binding,
        state: &mut DirectiveState,
    ) {
        if !binding.changed() {
            return;
        }
        if let Some(state) = state.downcast_mut::<KeyboardState>() {
            *state.config.borrow_mut() = KeyboardConfig::parse(&binding.value);
        }
    }

    fn unmounted(&self, doc: &mut Document, _el: NodeId, state: DirectiveState) {
        if let Ok(state) = state.downcast::<KeyboardState>() {
            doc.remove_listener(state.listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup() -> (Document, NodeId) {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);
        (doc, el)
    }

    fn counting_handler(hits: &Rc<Cell<u32>>) -> Value {
        let hits = hits.clone();
        Value::Handler(Handler::new(move |_, _| hits.set(hits.get() + 1)))
    }

    #[test]
    fn test_named_slot_handler() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let value = Value::map([("enter", counting_handler(&hits))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        let prevented = doc.key_down(el, KeyInput::new(Key::Enter));
        assert_eq!(hits.get(), 1);
        assert!(prevented);
    }

    #[test]
    fn test_combo_handler() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let value = Value::map([("ctrl+s", counting_handler(&hits))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.key_down(el, KeyInput::new(Key::Char('s')));
        assert_eq!(hits.get(), 0);
        doc.key_down(el, KeyInput::new(Key::Char('s')).with_ctrl());
        assert_eq!(hits.get(), 1);
        // Meta counts as ctrl.
        doc.key_down(el, KeyInput::new(Key::Char('s')).with_meta());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_raw_key_handler() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let value = Value::map([("w", counting_handler(&hits))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.key_down(el, KeyInput::new(Key::Char('w')));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_arrows_catch_all() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let value = Value::map([("arrows", counting_handler(&hits))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        for key in [Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight] {
            doc.key_down(el, KeyInput::new(key));
        }
        assert_eq!(hits.get(), 4);
        doc.key_down(el, KeyInput::new(Key::Enter));
        assert_eq!(hits.get(), 4);
    }

    #[test]
    fn test_named_slot_beats_arrows() {
        let (mut doc, el) = setup();
        let slot_hits = Rc::new(Cell::new(0));
        let arrow_hits = Rc::new(Cell::new(0));
        let value = Value::map([
            ("arrowUp", counting_handler(&slot_hits)),
            ("arrows", counting_handler(&arrow_hits)),
        ]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.key_down(el, KeyInput::new(Key::ArrowUp));
        assert_eq!(slot_hits.get(), 1);
        assert_eq!(arrow_hits.get(), 0);
    }

    #[test]
    fn test_nested_handlers_map() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let nested = Value::map([("Home", counting_handler(&hits))]);
        let value = Value::map([("handlers", nested)]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.key_down(el, KeyInput::new(Key::Named("Home".to_string())));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_custom_sees_unmatched_without_preventing() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let value = Value::map([("custom", counting_handler(&hits))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        let prevented = doc.key_down(el, KeyInput::new(Key::Char('q')));
        assert_eq!(hits.get(), 1);
        assert!(!prevented);
    }

    #[test]
    fn test_legacy_enter_clicks_element() {
        let (mut doc, el) = setup();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        doc.add_listener(el, EventType::Click, false, move |_, _| {
            counter.set(counter.get() + 1);
        });
        let value = Value::map([("enter", Value::from(true))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        doc.key_down(el, KeyInput::new(Key::Enter));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_legacy_enter_skips_form_fields() {
        let (mut doc, el) = setup();
        let input = doc.create_element("input");
        doc.append_child(el, input);
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        doc.add_listener(el, EventType::Click, false, move |_, _| {
            counter.set(counter.get() + 1);
        });
        let value = Value::map([("enter", Value::from(true))]);
        KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        // Enter inside a text field keeps its native behavior.
        doc.key_down(input, KeyInput::new(Key::Enter));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_legacy_space_only_for_buttons_and_links() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button);
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        doc.add_listener(button, EventType::Click, false, move |_, _| {
            counter.set(counter.get() + 1);
        });
        let value = Value::map([("space", Value::from(true))]);
        KeyboardDirective.mounted(&mut doc, button, &Binding::new(value));
        doc.key_down(button, KeyInput::new(Key::Space));
        assert_eq!(clicks.get(), 1);

        let div = doc.create_element("div");
        doc.append_child(doc.body(), div);
        let value = Value::map([("space", Value::from(true))]);
        KeyboardDirective.mounted(&mut doc, div, &Binding::new(value));
        doc.key_down(div, KeyInput::new(Key::Space));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_update_swaps_handlers() {
        let (mut doc, el) = setup();
        let old_hits = Rc::new(Cell::new(0));
        let new_hits = Rc::new(Cell::new(0));
        let old_value = Value::map([("escape", counting_handler(&old_hits))]);
        let mut state = KeyboardDirective.mounted(&mut doc, el, &Binding::new(old_value.clone()));

        let new_value = Value::map([("escape", counting_handler(&new_hits))]);
        let binding = Binding::new(new_value).with_old_value(old_value);
        KeyboardDirective.updated(&mut doc, el, &binding, &mut state);

        doc.key_down(el, KeyInput::new(Key::Escape));
        assert_eq!(old_hits.get(), 0);
        assert_eq!(new_hits.get(), 1);
    }

    #[test]
    fn test_unmount_removes_listener() {
        let (mut doc, el) = setup();
        let hits = Rc::new(Cell::new(0));
        let value = Value::map([("enter", counting_handler(&hits))]);
        let state = KeyboardDirective.mounted(&mut doc, el, &Binding::new(value));

        KeyboardDirective.unmounted(&mut doc, el, state);
        doc.key_down(el, KeyInput::new(Key::Enter));
        assert_eq!(hits.get(), 0);
    }
}
