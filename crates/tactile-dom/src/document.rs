//! Document
//!
//! Owns the node tree, the focus pointer, event listeners, timers, and
//! mutation observers. Single-threaded and event-driven: mutations and
//! input events run to completion, then batched observer callbacks are
//! delivered.

use crate::events::{Event, EventType, KeyInput, ListenerId};
use crate::focus::can_receive_focus;
use crate::node::{ElementData, Node};
use crate::observer::{
    MutationRecord, ObserveOptions, ObserverCallback, ObserverEntry, ObserverId,
};
use crate::scheduler::{Scheduler, TimerId};
use crate::selector::SelectorList;
use crate::tree::DomTree;
use crate::NodeId;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// How a scroll request was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// A recorded scroll-into-view request (the document is headless, so
/// scrolling is observable rather than performed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub behavior: ScrollBehavior,
}

type ListenerCallback = Rc<RefCell<dyn FnMut(&mut Document, &mut Event)>>;

struct Listener {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    capture: bool,
    callback: ListenerCallback,
}

enum ListenerPhase {
    Capture,
    Target,
    Bubble,
}

/// The headless document.
pub struct Document {
    tree: DomTree,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    listeners: Vec<Listener>,
    next_listener: u64,
    observers: Vec<ObserverEntry>,
    next_observer: u64,
    scheduler: Scheduler,
    scroll_requests: Vec<ScrollRequest>,
    selection_requests: Vec<NodeId>,
}

impl Document {
    /// Create a document with an empty body.
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let root = tree.insert(Node::document());
        let body = tree.insert(Node::element("body"));
        tree.append_child(root, body);
        Self {
            tree,
            root,
            body,
            focused: None,
            listeners: Vec::new(),
            next_listener: 0,
            observers: Vec::new(),
            next_observer: 0,
            scheduler: Scheduler::default(),
            scroll_requests: Vec::new(),
            selection_requests: Vec::new(),
        }
    }

    /// Document root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Body element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The underlying tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    // ----- tree construction -----

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.insert(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.insert(Node::text(content.to_string()))
    }

    /// Append `child` as the last child of `parent`, recording child-list
    /// mutations for the old parent (if any) and the new one.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let old_parent = self.tree.get(child).and_then(|n| n.parent);
        self.tree.append_child(parent, child);
        if self.tree.get(child).and_then(|n| n.parent) != Some(parent) {
            return; // append refused (bad ids, self-append)
        }
        if let Some(old) = old_parent {
            if old != parent {
                self.record_mutation(MutationRecord::child_list(old, Vec::new(), vec![child]));
            }
        }
        self.record_mutation(MutationRecord::child_list(parent, vec![child], Vec::new()));
    }

    /// Remove a node (and its subtree) from the tree. Clears the focus
    /// pointer if the focused node leaves the document.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.tree.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(focused) = self.focused {
            if self.tree.contains(id, focused) {
                self.focused = None;
            }
        }
        self.tree.detach(id);
        self.record_mutation(MutationRecord::child_list(parent, Vec::new(), vec![id]));
    }

    /// Whether the node is connected to the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some() && self.tree.contains(self.root, id)
    }

    /// Whether `ancestor` contains `node` (inclusive)
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.contains(ancestor, node)
    }

    // ----- element access -----

    /// Element data for a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id).and_then(Node::as_element)
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// Attribute value
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Attribute presence
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_attr(name))
    }

    /// Set an attribute, notifying observers with the old value
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(el) = self.tree.get_mut(id).and_then(Node::as_element_mut) else {
            return;
        };
        let old = el.set_attr(name, value);
        self.record_mutation(MutationRecord::attribute(id, name, old));
    }

    /// Remove an attribute, notifying observers with the old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let Some(el) = self.tree.get_mut(id).and_then(Node::as_element_mut) else {
            return;
        };
        let Some(old) = el.remove_attr(name) else {
            return;
        };
        self.record_mutation(MutationRecord::attribute(id, name, Some(old)));
    }

    /// Inline style property
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.style(property))
    }

    /// Set an inline style property
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(el) = self.tree.get_mut(id).and_then(Node::as_element_mut) {
            el.set_style(property, value);
        }
    }

    /// Remove an inline style property
    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if let Some(el) = self.tree.get_mut(id).and_then(Node::as_element_mut) {
            el.remove_style(property);
        }
    }

    /// Concatenated text of the node's subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.tree.get(id).and_then(Node::as_text) {
            out.push_str(text);
        }
        for child in self.tree.descendants(id) {
            if let Some(text) = self.tree.get(child).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the node's children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.element(id).is_none() {
            return;
        }
        let removed = self.tree.children(id);
        for child in &removed {
            self.tree.detach(*child);
        }
        let text_node = self.tree.insert(Node::text(text.to_string()));
        self.tree.append_child(id, text_node);
        self.record_mutation(MutationRecord::child_list(id, vec![text_node], removed));
    }

    /// Visibility: the node and all ancestors are free of `hidden`,
    /// `display: none`, and `visibility: hidden`.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut chain = vec![id];
        chain.extend(self.tree.ancestors(id));
        for node in chain {
            if let Some(el) = self.element(node) {
                if el.has_attr("hidden")
                    || el.style("display") == Some("none")
                    || el.style("visibility") == Some("hidden")
                {
                    return false;
                }
            }
        }
        true
    }

    // ----- queries -----

    /// First descendant of `root` matching the selector list, tree order
    pub fn query_selector(&self, root: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.tree
            .descendants(root)
            .into_iter()
            .find(|&id| self.element(id).is_some_and(|el| selectors.matches(el)))
    }

    /// All descendants of `root` matching the selector list, tree order
    pub fn query_selector_all(&self, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.tree
            .descendants(root)
            .into_iter()
            .filter(|&id| self.element(id).is_some_and(|el| selectors.matches(el)))
            .collect()
    }

    /// Attached element with the given id attribute
    pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.root)
            .into_iter()
            .find(|&id| self.element(id).is_some_and(|el| el.id.as_deref() == Some(id_value)))
    }

    // ----- focus -----

    /// Move focus to a node. Refused (returning false) for nodes that
    /// are detached, invisible, disabled, or not focusable at all.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if can_receive_focus(self, id) {
            self.focused = Some(id);
            true
        } else {
            debug!(node = id.index(), "focus refused");
            false
        }
    }

    /// Clear the focus pointer
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Currently focused node
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// Record a scroll-into-view request
    pub fn scroll_into_view(&mut self, target: NodeId, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest { target, behavior });
    }

    /// Scroll requests recorded so far
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Record a select-text-contents request (inputs and textareas)
    pub fn select_contents(&mut self, id: NodeId) {
        self.selection_requests.push(id);
    }

    /// Selection requests recorded so far
    pub fn selection_requests(&self) -> &[NodeId] {
        &self.selection_requests
    }

    // ----- events -----

    /// Register a listener for an event type on a node
    pub fn add_listener<F>(
        &mut self,
        node: NodeId,
        event_type: EventType,
        capture: bool,
        callback: F,
    ) -> ListenerId
    where
        F: FnMut(&mut Document, &mut Event) + 'static,
    {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push(Listener {
            id,
            node,
            event_type,
            capture,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Dispatch an event along the capture-then-bubble path. Returns
    /// whether any listener prevented the default action.
    pub fn dispatch(&mut self, mut event: Event) -> bool {
        let mut path = vec![event.target];
        path.extend(self.tree.ancestors(event.target));

        // Capture phase: root down to the target's parent.
        for idx in (1..path.len()).rev() {
            if event.is_propagation_stopped() {
                break;
            }
            self.run_listeners(path[idx], &mut event, ListenerPhase::Capture);
        }
        // At target: both capture and bubble listeners, registration order.
        if !event.is_propagation_stopped() {
            self.run_listeners(path[0], &mut event, ListenerPhase::Target);
        }
        // Bubble phase: target's parent up to the root.
        for &node in path.iter().skip(1) {
            if event.is_propagation_stopped() {
                break;
            }
            self.run_listeners(node, &mut event, ListenerPhase::Bubble);
        }

        self.deliver_mutations();
        event.is_default_prevented()
    }

    /// Dispatch a click at a node
    pub fn click(&mut self, id: NodeId) -> bool {
        self.dispatch(Event::click(id))
    }

    /// Dispatch a keydown at a node
    pub fn key_down(&mut self, id: NodeId, key: KeyInput) -> bool {
        self.dispatch(Event::key_down(id, key))
    }

    fn run_listeners(&mut self, node: NodeId, event: &mut Event, phase: ListenerPhase) {
        let snapshot: Vec<ListenerCallback> = self
            .listeners
            .iter()
            .filter(|l| {
                l.node == node
                    && l.event_type == event.event_type
                    && match phase {
                        ListenerPhase::Capture => l.capture,
                        ListenerPhase::Bubble => !l.capture,
                        ListenerPhase::Target => true,
                    }
            })
            .map(|l| Rc::clone(&l.callback))
            .collect();

        event.current_target = Some(node);
        for callback in snapshot {
            (callback.borrow_mut())(self, event);
        }
    }

    // ----- timers -----

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Schedule a deferred callback
    pub fn schedule<F>(&mut self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&mut Document) + 'static,
    {
        self.scheduler.schedule(delay_ms, Box::new(callback))
    }

    /// Cancel a pending timer. Returns false if it already fired.
    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Advance the virtual clock, firing due timers in deadline order
    /// and delivering batched mutation records after each task.
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now() + ms;
        while let Some(callback) = self.scheduler.pop_due(target) {
            callback(self);
            self.deliver_mutations();
        }
        self.scheduler.settle(target);
        self.deliver_mutations();
    }

    /// Run everything already due without moving the clock
    pub fn run_pending(&mut self) {
        self.advance(0);
    }

    // ----- mutation observers -----

    /// Observe mutations on a target (optionally its whole subtree)
    pub fn observe<F>(&mut self, target: NodeId, options: ObserveOptions, callback: F) -> ObserverId
    where
        F: FnMut(&mut Document, &[MutationRecord]) + 'static,
    {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        self.observers.push(ObserverEntry {
            id,
            target,
            options,
            callback: Rc::new(RefCell::new(callback)),
            pending: Vec::new(),
        });
        id
    }

    /// Disconnect an observer, dropping its pending records
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    fn record_mutation(&mut self, record: MutationRecord) {
        for obs in self.observers.iter_mut() {
            let in_subtree = self.tree.contains(obs.target, record.target);
            if obs.wants(&record, in_subtree) {
                obs.pending.push(record.clone());
            }
        }
    }

    /// Deliver batched records, one callback per observer. Records
    /// produced by the callbacks themselves wait for the next delivery.
    fn deliver_mutations(&mut self) {
        let mut deliveries: Vec<(ObserverCallback, Vec<MutationRecord>)> = Vec::new();
        for obs in self.observers.iter_mut() {
            if !obs.pending.is_empty() {
                deliveries.push((Rc::clone(&obs.callback), std::mem::take(&mut obs.pending)));
            }
        }
        for (callback, records) in deliveries {
            (callback.borrow_mut())(self, &records);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.len())
            .field("focused", &self.focused)
            .field("listeners", &self.listeners.len())
            .field("observers", &self.observers.len())
            .field("now", &self.scheduler.now())
            .finish()
    }
}
