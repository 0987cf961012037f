//! DOM Node
//!
//! Node structure and element data: attributes, inline styles, cached
//! id/class lookups.

use crate::NodeId;
use std::collections::HashSet;

/// DOM node linked into the arena tree.
#[derive(Debug)]
pub struct Node {
    /// Parent node (None if detached or root)
    pub parent: Option<NodeId>,
    /// First child
    pub first_child: Option<NodeId>,
    /// Last child (for O(1) append)
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data: NodeData::Text(TextData { content }),
        }
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data: NodeData::Document,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub name: String,
    /// Attributes in set order
    attrs: Vec<Attribute>,
    /// Inline style properties in set order
    styles: Vec<(String, String)>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Cached class list
    pub classes: HashSet<String>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            name: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            styles: Vec::new(),
            id: None,
            classes: HashSet::new(),
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, returning the previous value if any
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        self.refresh_cache(name, Some(value));
        for attr in &mut self.attrs {
            if attr.name == name {
                return Some(std::mem::replace(&mut attr.value, value.to_string()));
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        None
    }

    /// Remove an attribute, returning the previous value if any
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.refresh_cache(name, None);
        let idx = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(idx).value)
    }

    /// All attributes in set order
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Get an inline style property
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property
    pub fn set_style(&mut self, property: &str, value: &str) {
        for entry in &mut self.styles {
            if entry.0 == property {
                entry.1 = value.to_string();
                return;
            }
        }
        self.styles.push((property.to_string(), value.to_string()));
    }

    /// Remove an inline style property
    pub fn remove_style(&mut self, property: &str) {
        self.styles.retain(|(p, _)| p != property);
    }

    /// Parsed `tabindex` attribute, if present
    pub fn tab_index(&self) -> Option<TabIndex> {
        self.attr("tabindex").map(TabIndex::parse)
    }

    /// Whether this tag is a form control that honors `disabled`
    pub fn is_form_control(&self) -> bool {
        matches!(self.name.as_str(), "button" | "input" | "select" | "textarea")
    }

    /// Whether the `disabled` attribute is set
    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    fn refresh_cache(&mut self, name: &str, value: Option<&str>) {
        match name {
            "id" => self.id = value.map(str::to_string),
            "class" => {
                self.classes = value
                    .map(|v| v.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
            }
            _ => {}
        }
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Parsed tabindex value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Negative tabindex: programmatically focusable only
    NotSequential,
    /// Zero or positive: in the sequential tab order
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotSequential,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotSequential,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}
