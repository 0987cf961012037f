//! Simple selectors
//!
//! Tag / class / id / universal matching, plus comma-separated lists.
//! Deliberately not a CSS engine: richer matching (focusability,
//! enabled-day filtering) is done with predicates.

use crate::ElementData;

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_lowercase()))
        }
    }

    /// Check if an element matches
    pub fn matches(&self, el: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => el.name.eq_ignore_ascii_case(tag),
            Self::Id(id) => el.id.as_deref() == Some(id),
            Self::Class(class) => el.classes.contains(class),
        }
    }
}

/// Comma-separated selector list; matches if any entry matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<SimpleSelector>,
}

impl SelectorList {
    /// Parse a comma-separated list, skipping unparseable entries
    pub fn parse(s: &str) -> Self {
        Self {
            selectors: s.split(',').filter_map(SimpleSelector::parse).collect(),
        }
    }

    /// Check if an element matches any entry
    pub fn matches(&self, el: &ElementData) -> bool {
        self.selectors.iter().any(|sel| sel.matches(el))
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}
