// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred-action scheduling keyed by stable identities
//!
//! [`Timeouts`] lets any subsystem register "do X after N seconds", re-arm or
//! cancel that action by a stable key, and bulk-cancel unrelated actions
//! sharing a tag when their owning container goes away. At most one pending
//! action exists per key: scheduling against a live key re-arms the existing
//! handle in place instead of creating a duplicate.
//!
//! All operations are synchronous and complete immediately; only the firing
//! itself is deferred, driven by the host event loop calling
//! [`Timeouts::fire_due`]. Once a cancel operation returns, the affected
//! callback is guaranteed never to run.
//!
//! Contract note on re-arming: rescheduling an existing key without
//! supplying `tags` and with `replace_tags` left at its default (`true`)
//! clears the handle's group membership. Callers that want to keep a
//! handle's tags across a routine re-arm must either pass the tags again or
//! call [`Schedule::keep_tags`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::delay::{Delay, DelayValue};
use crate::error::TimeoutError;
use crate::queue::{TimerId, TimerQueue};

/// Error type callbacks may report; it is logged at the firing boundary,
/// never propagated into the event loop.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A single-shot deferred action
pub type Callback = Box<dyn FnOnce() -> Result<(), CallbackError> + Send>;

/// Identity a handle is registered under.
///
/// Callers that supply no key get an anonymous handle, keyed by its own
/// handle id: not reachable by key lookup, but still cancellable via the
/// returned [`TimeoutHandle`] or via its tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum HandleKey<K> {
    Explicit(K),
    Anonymous(u64),
}

/// Token for one live scheduled action.
///
/// Stays valid until the action fires or is cancelled; [`Timeouts::has_handle`]
/// detects staleness after either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeoutHandle(u64);

struct HandleEntry<K, T> {
    key: HandleKey<K>,
    tags: Vec<T>,
    callback: Option<Callback>,
    timer: Option<TimerId>,
}

/// Request builder for [`Timeouts::schedule`]
pub struct Schedule<K, T> {
    delay: Delay,
    callback: Option<Callback>,
    key: Option<K>,
    tags: Option<Vec<T>>,
    replace_tags: bool,
    exact: bool,
    cancel_on_zero: bool,
}

impl<K, T> Schedule<K, T> {
    /// Start a request that fires after `delay`
    pub fn after(delay: impl Into<Delay>) -> Self {
        Self {
            delay: delay.into(),
            callback: None,
            key: None,
            tags: None,
            replace_tags: true,
            exact: false,
            cancel_on_zero: false,
        }
    }

    /// Action to run when the delay elapses; may report an error, which is
    /// logged at the firing boundary
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Result<(), CallbackError> + Send + 'static,
    {
        self.callback = Some(Box::new(f));
        self
    }

    /// Infallible convenience form of [`Schedule::callback`]
    pub fn run<F>(self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.callback(move || {
            f();
            Ok(())
        })
    }

    /// Stable identity enforcing single-flight scheduling for this action
    pub fn key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Group labels for bulk cancellation; duplicates within the call
    /// collapse, first occurrence wins
    pub fn tags(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Single-tag convenience form of [`Schedule::tags`]
    pub fn tag(self, tag: T) -> Self {
        self.tags([tag])
    }

    /// On reschedule, replace the handle's tags (`true`, the default) or
    /// append-merge the supplied tags into the existing set (`false`)
    pub fn replace_tags(mut self, replace: bool) -> Self {
        self.replace_tags = replace;
        self
    }

    /// On reschedule with no tags supplied, keep the handle's current tags
    /// instead of clearing them
    pub fn keep_tags(self) -> Self {
        self.replace_tags(false)
    }

    /// Arm with millisecond resolution even for whole-second delays
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Treat a zero delay as "cancel the key's pending action" instead of an
    /// immediate re-fire
    pub fn cancel_on_zero(mut self) -> Self {
        self.cancel_on_zero = true;
        self
    }
}

/// Deferred-action scheduler: key registry, tag index, and the timer queue
/// they drive, kept mutually consistent behind this facade.
pub struct Timeouts<K, T, C = SystemClock> {
    clock: C,
    queue: TimerQueue,
    entries: HashMap<u64, HandleEntry<K, T>>,
    keys: HashMap<HandleKey<K>, u64>,
    tags: HashMap<T, HashSet<u64>>,
    by_timer: HashMap<TimerId, u64>,
    next_id: u64,
}

impl<K, T, C> Timeouts<K, T, C>
where
    K: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            queue: TimerQueue::new(),
            entries: HashMap::new(),
            keys: HashMap::new(),
            tags: HashMap::new(),
            by_timer: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule, or re-arm, a deferred action.
    ///
    /// Returns the handle for the pending action; `None` when the
    /// cancel-on-zero policy consumed the request. Fails before touching any
    /// state when the request has no callback or an invalid delay.
    pub fn schedule(&mut self, request: Schedule<K, T>) -> Result<Option<TimeoutHandle>, TimeoutError> {
        let callback = request.callback.ok_or(TimeoutError::MissingCallback)?;
        let value = request.delay.parse()?;

        if let Some(key) = &request.key {
            let key = HandleKey::Explicit(key.clone());
            if let Some(&id) = self.keys.get(&key) {
                if request.cancel_on_zero && value.is_zero() {
                    self.destroy(id);
                    return Ok(None);
                }
                self.reschedule(
                    id,
                    value,
                    callback,
                    request.tags,
                    request.replace_tags,
                    request.exact,
                );
                return Ok(Some(TimeoutHandle(id)));
            }
        }

        if request.cancel_on_zero && value.is_zero() {
            return Ok(None);
        }

        let id = self.next_id;
        self.next_id += 1;

        let key = match request.key {
            Some(key) => HandleKey::Explicit(key),
            None => HandleKey::Anonymous(id),
        };
        let tags = dedup(request.tags.unwrap_or_default());
        for tag in &tags {
            self.tags.entry(tag.clone()).or_default().insert(id);
        }
        let timer = self.arm(id, value, request.exact);
        self.keys.insert(key.clone(), id);
        self.entries.insert(
            id,
            HandleEntry {
                key,
                tags,
                callback: Some(callback),
                timer: Some(timer),
            },
        );
        Ok(Some(TimeoutHandle(id)))
    }

    /// The live handle registered under `key`, if any
    pub fn has(&self, key: &K) -> Option<TimeoutHandle> {
        self.keys
            .get(&HandleKey::Explicit(key.clone()))
            .map(|&id| TimeoutHandle(id))
    }

    /// Whether `handle` still refers to a pending action
    pub fn has_handle(&self, handle: TimeoutHandle) -> bool {
        self.entries.contains_key(&handle.0)
    }

    /// Cancel the pending action under `key`. Returns false when no action
    /// was pending; the callback is guaranteed never to run afterwards.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.has(key) {
            Some(handle) => self.destroy(handle.0).is_some(),
            None => false,
        }
    }

    /// Cancel by direct handle reference; false for stale handles
    pub fn cancel_handle(&mut self, handle: TimeoutHandle) -> bool {
        self.destroy(handle.0).is_some()
    }

    /// Cancel every pending action carrying `tag`; returns how many were
    /// destroyed
    pub fn cancel_tag(&mut self, tag: &T) -> usize {
        self.cancel_tags([tag.clone()])
    }

    /// Cancel every pending action carrying any of `tags`, in the order
    /// given. A handle matching several of the requested tags is destroyed
    /// and counted exactly once.
    pub fn cancel_tags(&mut self, tags: impl IntoIterator<Item = T>) -> usize {
        let mut destroyed = 0;
        for tag in tags {
            // Snapshot before destroying; destruction prunes the live sets.
            let members: Vec<u64> = self
                .tags
                .get(&tag)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();
            for id in members {
                if self.destroy(id).is_some() {
                    destroyed += 1;
                }
            }
        }
        destroyed
    }

    /// Current tags of a pending action, in registration order
    pub fn tags_of(&self, handle: TimeoutHandle) -> Option<&[T]> {
        self.entries.get(&handle.0).map(|entry| entry.tags.as_slice())
    }

    /// Number of pending actions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Time until the earliest pending deadline; zero when overdue
    pub fn until_next_deadline(&mut self) -> Option<Duration> {
        let now = self.clock.now();
        self.queue
            .next_deadline()
            .map(|at| at.saturating_duration_since(now))
    }

    /// Destroy every due handle and hand back its callback, earliest first.
    ///
    /// Both indexes and the timer queue are fully updated before this
    /// returns, so a host that keeps the scheduler behind a lock can drop
    /// the guard and then [`invoke`] the callbacks; a callback may schedule
    /// a new action under its freed key without deadlocking against the
    /// scheduler.
    pub fn take_due(&mut self) -> Vec<Callback> {
        let now = self.clock.now();
        let mut callbacks = Vec::new();

        for timer in self.queue.due(now) {
            let Some(&id) = self.by_timer.get(&timer) else {
                continue;
            };
            let Some(mut entry) = self.destroy(id) else {
                continue;
            };
            if let Some(callback) = entry.callback.take() {
                callbacks.push(callback);
            }
        }

        callbacks
    }

    /// Fire every action whose delay has elapsed.
    ///
    /// Convenience for single-threaded hosts: each fired handle is fully
    /// destroyed before any callback runs, and callback errors are logged
    /// here, never propagated. Returns the number of actions fired.
    pub fn fire_due(&mut self) -> usize {
        let callbacks = self.take_due();
        let fired = callbacks.len();
        for callback in callbacks {
            invoke(callback);
        }
        fired
    }

    fn arm(&mut self, id: u64, value: DelayValue, exact: bool) -> TimerId {
        let timer = self.queue.arm(self.clock.now(), value.to_timer(exact));
        self.by_timer.insert(timer, id);
        timer
    }

    /// Re-arm an existing handle in place. The handle identity and its key
    /// are unchanged throughout.
    fn reschedule(
        &mut self,
        id: u64,
        value: DelayValue,
        callback: Callback,
        tags: Option<Vec<T>>,
        replace_tags: bool,
        exact: bool,
    ) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        let old_tags = entry.tags.clone();

        // Full replace when requested or when the handle had no tags to
        // merge into; otherwise append-merge, preserving existing order.
        let (new_tags, register) = if replace_tags || old_tags.is_empty() {
            (dedup(tags.unwrap_or_default()), true)
        } else {
            match tags {
                None => (old_tags.clone(), false),
                Some(extra) => {
                    let mut merged = old_tags.clone();
                    for tag in dedup(extra) {
                        if !merged.contains(&tag) {
                            merged.push(tag);
                        }
                    }
                    (merged, true)
                }
            }
        };

        if register {
            // Registration is idempotent; re-adding a present member is a no-op.
            for tag in &new_tags {
                self.tags.entry(tag.clone()).or_default().insert(id);
            }
        }
        if replace_tags {
            for tag in &old_tags {
                if !new_tags.contains(tag) {
                    self.untag(tag, id);
                }
            }
        }

        let old_timer = match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.callback = Some(callback);
                entry.tags = new_tags;
                entry.timer.take()
            }
            None => None,
        };
        if let Some(timer) = old_timer {
            self.queue.disarm(timer);
            self.by_timer.remove(&timer);
        }
        let timer = self.arm(id, value, exact);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.timer = Some(timer);
        }
    }

    /// Remove a handle from every index and release its timer. Returns the
    /// entry so the firing path can take its callback.
    fn destroy(&mut self, id: u64) -> Option<HandleEntry<K, T>> {
        let entry = self.entries.remove(&id)?;
        if let Some(timer) = entry.timer {
            self.queue.disarm(timer);
            self.by_timer.remove(&timer);
        }
        self.keys.remove(&entry.key);
        for tag in &entry.tags {
            self.untag(tag, id);
        }
        Some(entry)
    }

    fn untag(&mut self, tag: &T, id: u64) {
        if let Some(set) = self.tags.get_mut(tag) {
            set.remove(&id);
            if set.is_empty() {
                self.tags.remove(tag);
            }
        }
    }
}

/// Run a fired callback, containing any error it reports at this boundary
pub fn invoke(callback: Callback) {
    if let Err(err) = callback() {
        warn!(error = %err, "timeout callback failed");
    }
}

/// Collapse duplicates, first occurrence wins
fn dedup<T: Eq + Hash + Clone>(tags: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}

#[cfg(test)]
#[path = "timeout_tests.rs"]
mod tests;
