//! Accessibility helpers
//!
//! Attribute batches and focus save/restore, shared by the directives.

use tactile_dom::{Document, NodeId};
use tracing::warn;

/// Set a batch of attributes on an element
pub fn set_attributes(doc: &mut Document, el: NodeId, attributes: &[(String, String)]) {
    for (name, value) in attributes {
        doc.set_attribute(el, name, value);
    }
}

/// Remove a batch of attributes from an element
pub fn remove_attributes(doc: &mut Document, el: NodeId, names: &[String]) {
    for name in names {
        doc.remove_attribute(el, name);
    }
}

/// Save the currently focused element
pub fn save_focus(doc: &Document) -> Option<NodeId> {
    doc.active_element()
}

/// Restore focus to a previously saved element. Silent no-op when
/// nothing was saved or the element has left the document; a refused
/// focus call is logged, never escalated.
pub fn restore_focus(doc: &mut Document, saved: Option<NodeId>) {
    let Some(target) = saved else {
        return;
    };
    if !doc.is_attached(target) {
        return;
    }
    if !doc.focus(target) {
        warn!(node = target.index(), "could not restore focus");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_batches() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);

        set_attributes(
            &mut doc,
            el,
            &[
                ("aria-label".to_string(), "Close".to_string()),
                ("aria-expanded".to_string(), "true".to_string()),
            ],
        );
        assert_eq!(doc.attribute(el, "aria-label"), Some("Close"));
        assert_eq!(doc.attribute(el, "aria-expanded"), Some("true"));

        remove_attributes(
            &mut doc,
            el,
            &["aria-label".to_string(), "aria-expanded".to_string()],
        );
        assert!(!doc.has_attribute(el, "aria-label"));
        assert!(!doc.has_attribute(el, "aria-expanded"));
    }

    #[test]
    fn test_restore_focus_tolerates_removal() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button);
        doc.focus(button);

        let saved = save_focus(&doc);
        doc.remove(button);

        // Gone from the document: restore must be a silent no-op.
        restore_focus(&mut doc, saved);
        assert_eq!(doc.active_element(), None);
    }
}
