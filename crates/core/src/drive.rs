// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-loop driver for the timeout scheduler
//!
//! The facade itself is synchronous; this loop is the host-side glue that
//! fires due actions and sleeps until the earlier of the next deadline and a
//! coarse idle tick. The idle tick also picks up timers armed while the
//! driver was asleep.
//!
//! Due callbacks are taken out of the scheduler and run after the lock is
//! released, so a callback may lock the shared scheduler itself, e.g. to
//! re-arm its own key.

use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::clock::Clock;
use crate::timeout::{invoke, Timeouts};

/// Upper bound on one sleep; keeps coarse-resolution armings from being
/// missed for longer than a second.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// Drive `timeouts` until `shutdown` flips to true (or its sender is
/// dropped).
pub async fn drive<K, T, C>(
    timeouts: Arc<Mutex<Timeouts<K, T, C>>>,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Clone + Eq + Hash + Send + 'static,
    T: Clone + Eq + Hash + Send + 'static,
    C: Clock + Send + 'static,
{
    loop {
        let (due, wait) = {
            let mut timeouts = timeouts.lock().unwrap_or_else(|e| e.into_inner());
            let due = timeouts.take_due();
            let wait = timeouts
                .until_next_deadline()
                .unwrap_or(IDLE_POLL)
                .min(IDLE_POLL);
            (due, wait)
        };

        // Invoked with the lock released; the callbacks may schedule
        if !due.is_empty() {
            debug!(fired = due.len(), "firing due timeouts");
        }
        for callback in due {
            invoke(callback);
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = tokio::time::sleep(wait) => {}
        }
    }

    debug!("timeout driver stopped");
}

#[cfg(test)]
#[path = "drive_tests.rs"]
mod tests;
