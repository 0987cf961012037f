//! Timer scheduler (virtual clock)
//!
//! Deferred callbacks ordered by deadline, then by scheduling order.
//! The document drives this from `advance`; nothing ever blocks.

use crate::Document;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub(crate) u64);

type TimerCallback = Box<dyn FnOnce(&mut Document)>;

struct TimerEntry {
    id: TimerId,
    deadline: u64,
    seq: u64,
    callback: TimerCallback,
}

/// Pending timers plus the virtual clock.
#[derive(Default)]
pub(crate) struct Scheduler {
    entries: Vec<TimerEntry>,
    now: u64,
    next_id: u64,
}

impl Scheduler {
    pub(crate) fn now(&self) -> u64 {
        self.now
    }

    pub(crate) fn schedule(&mut self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(TimerEntry {
            id,
            deadline: self.now + delay_ms,
            seq: self.next_id,
            callback,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// never scheduled.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Pop the earliest timer due at or before `target`, advancing the
    /// clock to its deadline.
    pub(crate) fn pop_due(&mut self, target: u64) -> Option<TimerCallback> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= target)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(idx);
        self.now = self.now.max(entry.deadline);
        Some(entry.callback)
    }

    /// Move the clock forward without running anything (callers drain
    /// due timers first).
    pub(crate) fn settle(&mut self, target: u64) {
        self.now = self.now.max(target);
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.entries.len())
            .finish()
    }
}
