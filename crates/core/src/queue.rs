// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-threaded timer primitive
//!
//! A min-heap of deadlines with at-most-once firing per arming. Disarming
//! before [`TimerQueue::due`] pops the entry unconditionally prevents the
//! firing; stale heap entries for disarmed timers are dropped lazily.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use crate::delay::TimerDelay;

/// Opaque identifier for one pending arming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Pending one-shot timers
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<(Instant, u64)>>,
    // Live armings; a heap entry whose id is absent here was disarmed or
    // already fired.
    armed: HashMap<u64, Instant>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer relative to `now`.
    pub fn arm(&mut self, now: Instant, delay: TimerDelay) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;

        let deadline = now + delay.duration();
        self.heap.push(Reverse((deadline, id)));
        self.armed.insert(id, deadline);
        TimerId(id)
    }

    /// Cancel a pending arming. Unknown or already-fired ids are no-ops.
    pub fn disarm(&mut self, id: TimerId) {
        self.armed.remove(&id.0);
    }

    /// Pop every timer due at or before `now`, earliest first.
    pub fn due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut ready = Vec::new();

        while let Some(Reverse((deadline, id))) = self.heap.peek().copied() {
            if deadline > now {
                break;
            }
            self.heap.pop();
            if self.armed.remove(&id).is_some() {
                ready.push(TimerId(id));
            }
        }

        ready
    }

    /// Earliest live deadline, pruning disarmed entries off the top.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(Reverse((deadline, id))) = self.heap.peek().copied() {
            if self.armed.contains_key(&id) {
                return Some(deadline);
            }
            self.heap.pop();
        }
        None
    }

    /// Number of live armings
    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
