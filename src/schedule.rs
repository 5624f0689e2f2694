//! Deterministic timer queue.
//!
//! Components register one-shot or repeating [`Task`]s instead of calling
//! into a real timer API. The host advances time, either from a real clock
//! in the browser or by hand in tests, and runs whatever became due.

use crate::page::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Handle returned for every registration, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Refresh the time and date slots
    ClockTick,
    /// Decide whether an icon that has not settled needs the fallback
    IconTimeout(NodeId),
    /// Mark a category section visible
    Reveal(NodeId),
    /// Start fading a toast
    ToastFade(NodeId),
    /// Remove a faded toast
    ToastRemove(NodeId),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: TimerHandle,
    task: Task,
    period: Option<u64>,
}

/// Timer queue ordered by due time, then by registration order
#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Entry>,
    slots: HashMap<TimerHandle, (u64, u64)>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the scheduler started
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Runs `task` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_seq);
        self.enqueue(self.now.saturating_add(delay_ms), Entry {
            handle,
            task,
            period: None,
        });
        handle
    }

    /// Runs `task` every `period_ms`, first after one period
    pub fn schedule_every(&mut self, period_ms: u64, task: Task) -> TimerHandle {
        let period = period_ms.max(1);
        let handle = TimerHandle(self.next_seq);
        self.enqueue(self.now.saturating_add(period), Entry {
            handle,
            task,
            period: Some(period),
        });
        handle
    }

    /// Cancels a pending registration. Returns `false` if it already fired
    /// or was cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.slots.remove(&handle) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    /// Number of pending registrations
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending registration
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pops the earliest registration due at or before `until`, moving the
    /// clock to its due time.
    ///
    /// Repeating registrations are re-armed on their period grid, at the
    /// first slot after `until`: one that fell several periods behind fires
    /// once, the way a browser interval does after the tab sleeps. A
    /// registration whose next slot would pass `u64::MAX` is dropped.
    pub fn pop_due(&mut self, until: u64) -> Option<Task> {
        let (&key, _) = self.queue.iter().next()?;
        let (due, _) = key;
        if due > until {
            return None;
        }
        let entry = self.queue.remove(&key)?;
        self.slots.remove(&entry.handle);
        self.now = self.now.max(due);
        if let Some(next) = entry.period.and_then(|period| next_slot(due, period, until)) {
            self.enqueue(next, entry);
        }
        Some(entry.task)
    }

    /// Moves the clock forward to `until` once nothing else is due
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    fn enqueue(&mut self, due: u64, entry: Entry) {
        let key = (due, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(entry.handle, key);
        self.queue.insert(key, entry);
    }
}

fn next_slot(due: u64, period: u64, until: u64) -> Option<u64> {
    let missed = until.saturating_sub(due) / period;
    missed
        .checked_add(1)
        .and_then(|slots| slots.checked_mul(period))
        .and_then(|offset| due.checked_add(offset))
}
