//! Date picker focus assistant (`a11y-date-picker`)
//!
//! Watches the bound container for a calendar panel opening and moves
//! keyboard focus onto the most relevant day cell: the selected date,
//! else today, else the first enabled day. Works with the class
//! conventions of the common widget libraries out of the box, with
//! every selector overridable.
//!
//! Panels often render a frame or two after the input reports
//! expanded, so the focus attempt retries on a short interval until
//! the cell exists and takes focus.

use std::cell::RefCell;
use std::rc::Rc;

use crate::binding::{Binding, Value};
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{
    Document, EventType, ListenerId, NodeId, ObserveOptions, ObserverId, SelectorList, TimerId,
};

const DEFAULT_FOCUS_DELAY_MS: u64 = 100;
const FOCUS_RETRY_INTERVAL_MS: u64 = 25;
const MAX_FOCUS_ATTEMPTS: u32 = 8;

const DEFAULT_PANEL: &str =
    ".el-picker-panel, .el-date-picker, .v-picker, .v-date-picker, .ant-picker-dropdown, .p-datepicker";
const DEFAULT_SELECTED: &str =
    ".is-selected, .selected, .v-date-picker-table__current, .ant-picker-cell-selected, .p-highlight";
const DEFAULT_TODAY: &str = ".is-today, .v-date-picker-table__today, .ant-picker-cell-today";
const DEFAULT_AVAILABLE: &str = "td";
const DEFAULT_INPUT: &str =
    ".el-input__inner, .v-text-field__input, .ant-picker-input, .p-inputtext, input";

const DISABLED_DAY_CLASSES: &[&str] =
    &["disabled", "is-disabled", "ant-picker-cell-disabled", "p-disabled"];

#[derive(Debug, Clone)]
struct DatePickerConfig {
    delay: u64,
    panel: SelectorList,
    selected: SelectorList,
    today: SelectorList,
    available: SelectorList,
    input: SelectorList,
}

impl DatePickerConfig {
    fn parse(value: &Value) -> Self {
        let selector = |key: &str, default: &str| {
            SelectorList::parse(value.get(key).and_then(Value::as_str).unwrap_or(default))
        };
        Self {
            delay: match value {
                Value::Int(n) => (*n).max(0) as u64,
                _ => value
                    .get("delay")
                    .and_then(Value::as_int)
                    .map(|n| n.max(0) as u64)
                    .unwrap_or(DEFAULT_FOCUS_DELAY_MS),
            },
            panel: selector("panelSelector", DEFAULT_PANEL),
            selected: selector("selectedSelector", DEFAULT_SELECTED),
            today: selector("todaySelector", DEFAULT_TODAY),
            available: selector("availableSelector", DEFAULT_AVAILABLE),
            input: selector("inputSelector", DEFAULT_INPUT),
        }
    }
}

struct Assist {
    container: NodeId,
    input: NodeId,
    config: DatePickerConfig,
    open: bool,
    panel: Option<NodeId>,
    focus_timer: Option<TimerId>,
    attempts: u32,
    panel_guard: Option<ListenerId>,
}

type Shared = Rc<RefCell<Assist>>;

/// Locate the panel for this picker: the element the input points at
/// via `aria-controls` when present, else the first visible panel
/// match inside the container.
fn find_panel(doc: &Document, assist: &Assist) -> Option<NodeId> {
    if let Some(id) = doc.attribute(assist.input, "aria-controls") {
        if let Some(panel) = doc.element_by_id(id) {
            if doc.is_visible(panel) {
                return Some(panel);
            }
        }
    }
    doc.tree()
        .descendants(assist.container)
        .into_iter()
        .find(|&node| {
            doc.element(node)
                .is_some_and(|el| assist.config.panel.matches(el))
                && doc.is_visible(node)
        })
}

fn is_enabled_day(doc: &Document, cell: NodeId) -> bool {
    doc.element(cell).is_some_and(|el| {
        !el.has_attr("disabled")
            && el.attr("aria-disabled") != Some("true")
            && !DISABLED_DAY_CLASSES
                .iter()
                .any(|class| el.classes.contains(*class))
    })
}

/// Focus precedence: selected date, then today, then the first
/// enabled day.
fn pick_cell(doc: &Document, panel: NodeId, config: &DatePickerConfig) -> Option<NodeId> {
    doc.query_selector(panel, &config.selected)
        .or_else(|| doc.query_selector(panel, &config.today))
        .or_else(|| {
            doc.query_selector_all(panel, &config.available)
                .into_iter()
                .find(|&cell| is_enabled_day(doc, cell))
        })
}

fn arm_focus_timer(doc: &mut Document, shared: &Shared, delay: u64) {
    let assist = shared.clone();
    let timer = doc.schedule(delay, move |doc| attempt_focus(doc, &assist));
    shared.borrow_mut().focus_timer = Some(timer);
}

fn schedule_focus(doc: &mut Document, shared: &Shared) {
    let (existing, delay) = {
        let mut assist = shared.borrow_mut();
        assist.attempts = 0;
        (assist.focus_timer.take(), assist.config.delay)
    };
    if let Some(timer) = existing {
        doc.cancel_timer(timer);
    }
    arm_focus_timer(doc, shared, delay);
}

fn attempt_focus(doc: &mut Document, shared: &Shared) {
    let (open, panel) = {
        let mut assist = shared.borrow_mut();
        assist.focus_timer = None;
        (assist.open, assist.panel)
    };
    if !open {
        return;
    }
    let Some(panel) = panel.filter(|&p| doc.is_attached(p)) else {
        return;
    };

    let cell = {
        let assist = shared.borrow();
        pick_cell(doc, panel, &assist.config)
    };
    if let Some(cell) = cell {
        let prev_tabindex = doc.attribute(cell, "tabindex").map(str::to_string);
        doc.set_attribute(cell, "tabindex", "0");
        if doc.focus(cell) {
            install_guard(doc, shared, panel);
            return;
        }
        // Focus refused: put the cell's tabindex back.
        match prev_tabindex {
            Some(value) => doc.set_attribute(cell, "tabindex", &value),
            None => {
                doc.remove_attribute(cell, "tabindex");
            }
        }
    }

    let attempts = {
        let mut assist = shared.borrow_mut();
        assist.attempts += 1;
        assist.attempts
    };
    if attempts < MAX_FOCUS_ATTEMPTS {
        arm_focus_timer(doc, shared, FOCUS_RETRY_INTERVAL_MS);
    }
}

/// Arrow keys move focus between day cells; without this guard the
/// widget treats the keydown as a selection.
fn install_guard(doc: &mut Document, shared: &Shared, panel: NodeId) {
    if shared.borrow().panel_guard.is_some() {
        return;
    }
    let listener = doc.add_listener(panel, EventType::KeyDown, true, |_, event| {
        if event.key().map(|k| k.key.is_arrow()).unwrap_or(false) {
            event.prevent_default();
        }
    });
    shared.borrow_mut().panel_guard = Some(listener);
}

fn close(doc: &mut Document, shared: &Shared) {
    let (timer, guard) = {
        let mut assist = shared.borrow_mut();
        assist.open = false;
        assist.panel = None;
        assist.attempts = 0;
        (assist.focus_timer.take(), assist.panel_guard.take())
    };
    if let Some(timer) = timer {
        doc.cancel_timer(timer);
    }
    if let Some(guard) = guard {
        doc.remove_listener(guard);
    }
}

fn sync_open_state(doc: &mut Document, shared: &Shared) {
    let (panel, was_open) = {
        let assist = shared.borrow();
        (find_panel(doc, &assist), assist.open)
    };
    match (panel, was_open) {
        (Some(panel), false) => {
            {
                let mut assist = shared.borrow_mut();
                assist.open = true;
                assist.panel = Some(panel);
            }
            schedule_focus(doc, shared);
        }
        (Some(panel), true) => {
            // The panel can appear after aria-expanded already
            // reported the picker open.
            let had_panel = {
                let mut assist = shared.borrow_mut();
                let had = assist.panel.is_some();
                assist.panel = Some(panel);
                had
            };
            if !had_panel {
                schedule_focus(doc, shared);
            }
        }
        (None, true) => close(doc, shared),
        (None, false) => {}
    }
}

fn on_expanded_change(doc: &mut Document, shared: &Shared) {
    let input = shared.borrow().input;
    if doc.attribute(input, "aria-expanded") == Some("true") {
        let panel = {
            let assist = shared.borrow();
            find_panel(doc, &assist)
        };
        {
            let mut assist = shared.borrow_mut();
            assist.open = true;
            assist.panel = panel;
        }
        schedule_focus(doc, shared);
    } else {
        close(doc, shared);
    }
}

struct DatePickerState {
    shared: Shared,
    subtree_observer: ObserverId,
    expanded_observer: ObserverId,
}

/// `a11y-date-picker`
pub struct DatePickerDirective;

impl Directive for DatePickerDirective {
    fn mounted(&self, doc: &mut Document, el: NodeId, binding: &Binding) -> DirectiveState {
        let config = DatePickerConfig::parse(&binding.value);
        let input = doc.query_selector(el, &config.input).unwrap_or(el);

        let shared: Shared = Rc::new(RefCell::new(Assist {
            container: el,
            input,
            config,
            open: false,
            panel: None,
            focus_timer: None,
            attempts: 0,
            panel_guard: None,
        }));

        let watcher = shared.clone();
        let subtree_observer = doc.observe(
            el,
            ObserveOptions {
                child_list: true,
                subtree: true,
                ..Default::default()
            },
            move |doc, _| sync_open_state(doc, &watcher),
        );

        let expanded = shared.clone();
        let expanded_observer = doc.observe(
            input,
            ObserveOptions {
                attributes: true,
                attribute_filter: Some(vec!["aria-expanded".to_string()]),
                ..Default::default()
            },
            move |doc, _| on_expanded_change(doc, &expanded),
        );

        // The panel may be open already when the directive mounts.
        sync_open_state(doc, &shared);

        Box::new(DatePickerState {
            shared,
            subtree_observer,
            expanded_observer,
        })
    }

    fn unmounted(&self, doc: &mut Document, _el: NodeId, state: DirectiveState) {
        let Ok(state) = state.downcast::<DatePickerState>() else {
            return;
        };
        doc.disconnect(state.subtree_observer);
        doc.disconnect(state.expanded_observer);
        close(doc, &state.shared);
    }
}
