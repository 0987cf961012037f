//! Tactile DOM - Headless document host
//!
//! A single-threaded, arena-based DOM that the accessibility directives
//! bind to: nodes, attributes, inline styles, simple selectors, a
//! document-level focus pointer, synthetic input events with
//! capture/bubble dispatch, a virtual-clock timer scheduler, and
//! mutation observers.
//!
//! All work runs cooperatively on the caller's thread. "Later" only ever
//! means a deferred callback: timers fire from [`Document::advance`],
//! and mutation-observer callbacks are batched and delivered after the
//! task that caused them.

mod document;
mod events;
mod focus;
mod node;
mod observer;
mod scheduler;
mod selector;
mod tree;

pub use document::{Document, ScrollBehavior, ScrollRequest};
pub use events::{Event, EventType, Key, KeyInput, ListenerId};
pub use focus::{
    first_focusable, focusable_descendants, is_natively_focusable, last_focusable,
};
pub use node::{Attribute, ElementData, Node, NodeData, TabIndex, TextData};
pub use observer::{MutationKind, MutationRecord, ObserveOptions, ObserverId};
pub use scheduler::TimerId;
pub use selector::{SelectorList, SimpleSelector};
pub use tree::DomTree;

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
