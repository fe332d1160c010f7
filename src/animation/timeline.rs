use std::collections::BTreeMap;

use crate::foundation::core::Millis;

/// Handle to a scheduled task. Ordering is `(due, insertion sequence)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle {
    due: Millis,
    seq: u64,
}

impl TaskHandle {
    /// Time at which the task fires.
    pub fn due(self) -> Millis {
        self.due
    }
}

/// Single-threaded queue of cancellable scheduled tasks on a virtual clock.
///
/// Tasks are plain values rather than closures so the owner can dispatch them with full mutable
/// access to its own state. Tasks due at the same instant run in insertion order.
#[derive(Debug)]
pub struct Timeline<T> {
    now: Millis,
    next_seq: u64,
    queue: BTreeMap<TaskHandle, T>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    /// Empty timeline at time zero.
    pub fn new() -> Self {
        Self {
            now: Millis::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `task` at `due` (never earlier than now).
    pub fn schedule_at(&mut self, due: Millis, task: T) -> TaskHandle {
        let handle = TaskHandle {
            due: due.max(self.now),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(handle, task);
        handle
    }

    /// Schedule `task` `delay` after now.
    pub fn schedule_in(&mut self, delay: Millis, task: T) -> TaskHandle {
        self.schedule_at(self.now.after(delay), task)
    }

    /// Cancel a pending task, returning it if it had not run yet.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        self.queue.remove(&handle)
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest queued task.
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|h| h.due)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to its due time.
    ///
    /// Tasks scheduled while draining (at or before `until`) are returned by later calls, so a
    /// `while let` loop drains cascades in one pass.
    pub fn pop_due(&mut self, until: Millis) -> Option<(TaskHandle, T)> {
        let (&handle, _) = self.queue.iter().next()?;
        if handle.due > until {
            return None;
        }
        let task = self.queue.remove(&handle)?;
        self.now = self.now.max(handle.due);
        Some((handle, task))
    }

    /// Move the clock forward to `until` once draining is complete.
    pub fn settle(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
