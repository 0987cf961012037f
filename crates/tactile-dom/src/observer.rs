//! Mutation observers
//!
//! Observe child-list and attribute changes on a node or its subtree.
//! Records batch up and are delivered after the task that produced them,
//! never re-entrantly.

use crate::{Document, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Handle to a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
}

/// Mutation record
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub(crate) fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added,
            removed,
            attribute_name: None,
            old_value: None,
        }
    }

    pub(crate) fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            added: Vec::new(),
            removed: Vec::new(),
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }
}

/// Observation options
#[derive(Debug, Clone, Default)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
    pub attribute_filter: Option<Vec<String>>,
}

pub(crate) type ObserverCallback = Rc<RefCell<dyn FnMut(&mut Document, &[MutationRecord])>>;

pub(crate) struct ObserverEntry {
    pub(crate) id: ObserverId,
    pub(crate) target: NodeId,
    pub(crate) options: ObserveOptions,
    pub(crate) callback: ObserverCallback,
    pub(crate) pending: Vec<MutationRecord>,
}

impl ObserverEntry {
    /// Whether this observer wants the record. `in_subtree` is the
    /// precomputed containment of the record target in the observed
    /// subtree.
    pub(crate) fn wants(&self, record: &MutationRecord, in_subtree: bool) -> bool {
        let scope_ok = if self.options.subtree {
            in_subtree
        } else {
            self.target == record.target
        };
        if !scope_ok {
            return false;
        }

        match record.kind {
            MutationKind::ChildList => self.options.child_list,
            MutationKind::Attributes => {
                if !self.options.attributes {
                    return false;
                }
                match (&self.options.attribute_filter, &record.attribute_name) {
                    (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                    _ => true,
                }
            }
        }
    }
}

impl std::fmt::Debug for ObserverEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverEntry")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("pending", &self.pending.len())
            .finish()
    }
}
