//! Announce directive (`a11y-announce`) and helper
//!
//! Screen-reader announcements through transient live regions. Each
//! call creates a fresh, visually hidden region, populates its text
//! after a short delay (so assistive technology reliably sees the
//! mutation), and removes the node after a fixed longer delay. Regions
//! are independent and never pooled.

use crate::binding::{Binding, Value};
use crate::registry::{Directive, DirectiveState};
use tactile_dom::{Document, NodeId};

/// Delay before the region's text is populated
pub const TEXT_DELAY_MS: u64 = 100;
/// Delay before the region is removed again
pub const REMOVE_DELAY_MS: u64 = 3000;

/// Live region politeness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Polite,
    Assertive,
}

impl Priority {
    pub fn parse(s: &str) -> Self {
        match s {
            "assertive" => Self::Assertive,
            _ => Self::Polite,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// Create a transient live region announcing `message`.
pub fn announce(doc: &mut Document, message: &str, priority: Priority) {
    let region = doc.create_element("div");
    doc.set_attribute(region, "role", "status");
    doc.set_attribute(region, "aria-live", priority.as_str());
    doc.set_attribute(region, "aria-atomic", "true");

    // Visually hidden, still exposed to assistive technology.
    doc.set_style(region, "position", "absolute");
    doc.set_style(region, "left", "-10000px");
    doc.set_style(region, "width", "1px");
    doc.set_style(region, "height", "1px");
    doc.set_style(region, "overflow", "hidden");

    let body = doc.body();
    doc.append_child(body, region);

    let message = message.to_string();
    doc.schedule(TEXT_DELAY_MS, move |doc| {
        doc.set_text_content(region, &message);
    });
    doc.schedule(REMOVE_DELAY_MS, move |doc| {
        doc.remove(region);
    });
}

struct AnnounceConfig {
    message: Option<String>,
    priority: Priority,
}

impl AnnounceConfig {
    fn parse(value: &Value) -> Self {
        match value {
            Value::Str(message) => Self {
                message: Some(message.clone()),
                priority: Priority::Polite,
            },
            Value::Map(_) => Self {
                message: value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                priority: value
                    .get("priority")
                    .and_then(Value::as_str)
                    .map(Priority::parse)
                    .unwrap_or_default(),
            },
            _ => Self {
                message: None,
                priority: Priority::Polite,
            },
        }
    }
}

fn announce_binding(doc: &mut Document, binding: &Binding) {
    let config = AnnounceConfig::parse(&binding.value);
    if let Some(message) = config.message.filter(|m| !m.is_empty()) {
        announce(doc, &message, config.priority);
    }
}

/// `a11y-announce`
pub struct AnnounceDirective;

impl Directive for AnnounceDirective {
    fn mounted(&self, doc: &mut Document, _el: NodeId, binding: &Binding) -> DirectiveState {
        announce_binding(doc, binding);
        Box::new(())
    }

    fn updated(
        &self,
        doc: &mut Document,
        _el: NodeId,
        binding: &Binding,
        _state: &mut DirectiveState,
    ) {
        // Only announce when the bound value actually changed.
        if binding.changed() {
            announce_binding(doc, binding);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactile_dom::SelectorList;

    fn live_regions(doc: &Document) -> Vec<NodeId> {
        doc.query_selector_all(doc.body(), &SelectorList::parse("div"))
            .into_iter()
            .filter(|&id| doc.attribute(id, "aria-live").is_some())
            .collect()
    }

    #[test]
    fn test_region_lifecycle() {
        let mut doc = Document::new();
        announce(&mut doc, "Item added to cart", Priority::Polite);

        let regions = live_regions(&doc);
        assert_eq!(regions.len(), 1);
        let region = regions[0];
        assert_eq!(doc.attribute(region, "role"), Some("status"));
        assert_eq!(doc.attribute(region, "aria-live"), Some("polite"));
        assert_eq!(doc.attribute(region, "aria-atomic"), Some("true"));

        // Text lands only after the detection delay.
        assert_eq!(doc.text_content(region), "");
        doc.advance(TEXT_DELAY_MS);
        assert_eq!(doc.text_content(region), "Item added to cart");

        // And the node is removed after the cleanup delay.
        doc.advance(REMOVE_DELAY_MS);
        assert!(!doc.is_attached(region));
    }

    #[test]
    fn test_two_announcements_are_independent() {
        let mut doc = Document::new();
        announce(&mut doc, "First", Priority::Polite);
        doc.advance(50);
        announce(&mut doc, "Second", Priority::Assertive);

        let regions = live_regions(&doc);
        assert_eq!(regions.len(), 2);

        doc.advance(100);
        assert_eq!(doc.text_content(regions[0]), "First");
        assert_eq!(doc.text_content(regions[1]), "Second");

        // First one dies at t=3000, second at t=3050.
        doc.advance(REMOVE_DELAY_MS - 150);
        assert!(!doc.is_attached(regions[0]));
        assert!(doc.is_attached(regions[1]));
        doc.advance(50);
        assert!(!doc.is_attached(regions[1]));
    }

    #[test]
    fn test_directive_announces_on_change_only() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);
        let directive = AnnounceDirective;

        let mut state = directive.mounted(&mut doc, el, &Binding::new(Value::from("M1")));
        assert_eq!(live_regions(&doc).len(), 1);

        // Same value again: no new region.
        let unchanged = Binding::new(Value::from("M1")).with_old_value(Value::from("M1"));
        directive.updated(&mut doc, el, &unchanged, &mut state);
        assert_eq!(live_regions(&doc).len(), 1);

        let changed = Binding::new(Value::from("M2")).with_old_value(Value::from("M1"));
        directive.updated(&mut doc, el, &changed, &mut state);
        assert_eq!(live_regions(&doc).len(), 2);
    }

    #[test]
    fn test_structured_value_priority() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);

        let value = Value::map([
            ("message", Value::from("Error occurred")),
            ("priority", Value::from("assertive")),
        ]);
        AnnounceDirective.mounted(&mut doc, el, &Binding::new(value));

        let regions = live_regions(&doc);
        assert_eq!(regions.len(), 1);
        assert_eq!(doc.attribute(regions[0], "aria-live"), Some("assertive"));
    }

    #[test]
    fn test_empty_message_is_noop() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);

        AnnounceDirective.mounted(&mut doc, el, &Binding::missing());
        AnnounceDirective.mounted(&mut doc, el, &Binding::new(Value::from("")));
        assert!(live_regions(&doc).is_empty());
    }
}
