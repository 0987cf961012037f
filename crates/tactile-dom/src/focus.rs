//! Focusability
//!
//! Which elements can take keyboard focus, and enumeration of focusable
//! descendants in tree order.

use crate::{Document, ElementData, NodeId};

/// Whether the element is focusable by its own nature, before tabindex
/// or visibility are considered: links with href, enabled form controls
/// (hidden inputs excluded), contenteditable, media with controls.
pub fn is_natively_focusable(el: &ElementData) -> bool {
    match el.name.as_str() {
        "a" => el.has_attr("href"),
        "button" | "select" | "textarea" => !el.is_disabled(),
        "input" => !el.is_disabled() && el.attr("type") != Some("hidden"),
        "audio" | "video" => el.has_attr("controls"),
        _ => el.attr("contenteditable") == Some("true"),
    }
}

/// Whether a node can receive programmatic focus: attached, visible,
/// not disabled, and natively focusable or carrying any tabindex.
pub(crate) fn can_receive_focus(doc: &Document, id: NodeId) -> bool {
    if !doc.is_attached(id) || !doc.is_visible(id) {
        return false;
    }
    let Some(el) = doc.element(id) else {
        return false;
    };
    if el.is_disabled() {
        return false;
    }
    is_natively_focusable(el) || el.has_attr("tabindex")
}

/// Whether a node participates in sequential (Tab) navigation.
fn is_tabbable(doc: &Document, id: NodeId) -> bool {
    if !doc.is_visible(id) {
        return false;
    }
    let Some(el) = doc.element(id) else {
        return false;
    };
    if el.is_disabled() {
        return false;
    }
    match el.tab_index() {
        Some(t) => t.is_sequential(),
        None => is_natively_focusable(el),
    }
}

/// All focusable descendants of a container, in tree order.
pub fn focusable_descendants(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.tree()
        .descendants(root)
        .into_iter()
        .filter(|&id| is_tabbable(doc, id))
        .collect()
}

/// First focusable descendant, if any
pub fn first_focusable(doc: &Document, root: NodeId) -> Option<NodeId> {
    focusable_descendants(doc, root).into_iter().next()
}

/// Last focusable descendant, if any
pub fn last_focusable(doc: &Document, root: NodeId) -> Option<NodeId> {
    focusable_descendants(doc, root).into_iter().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_focusable_enumeration() {
        let mut doc = Document::new();
        let container = doc.create_element("div");
        doc.append_child(doc.body(), container);

        let link = doc.create_element("a");
        doc.set_attribute(link, "href", "#top");
        let button = doc.create_element("button");
        let disabled = doc.create_element("button");
        doc.set_attribute(disabled, "disabled", "");
        let hidden_input = doc.create_element("input");
        doc.set_attribute(hidden_input, "type", "hidden");
        let negative = doc.create_element("div");
        doc.set_attribute(negative, "tabindex", "-1");
        let positive = doc.create_element("div");
        doc.set_attribute(positive, "tabindex", "0");

        for id in [link, button, disabled, hidden_input, negative, positive] {
            doc.append_child(container, id);
        }

        assert_eq!(focusable_descendants(&doc, container), vec![link, button, positive]);
        assert_eq!(first_focusable(&doc, container), Some(link));
        assert_eq!(last_focusable(&doc, container), Some(positive));
    }

    #[test]
    fn test_invisible_excluded() {
        let mut doc = Document::new();
        let container = doc.create_element("div");
        doc.append_child(doc.body(), container);

        let shown = doc.create_element("button");
        let hidden = doc.create_element("button");
        doc.set_attribute(hidden, "hidden", "");
        let styled_away = doc.create_element("button");
        doc.set_style(styled_away, "display", "none");

        doc.append_child(container, shown);
        doc.append_child(container, hidden);
        doc.append_child(container, styled_away);

        assert_eq!(focusable_descendants(&doc, container), vec![shown]);
    }

    #[test]
    fn test_hidden_ancestor_excluded() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        doc.set_style(outer, "visibility", "hidden");
        doc.append_child(doc.body(), outer);

        let button = doc.create_element("button");
        doc.append_child(outer, button);

        assert!(focusable_descendants(&doc, outer).is_empty());
    }
}
