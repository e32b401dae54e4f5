// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::timeout::{Schedule, Timeouts};
use std::sync::atomic::{AtomicUsize, Ordering};

type SharedTimeouts = Arc<Mutex<Timeouts<String, String, FakeClock>>>;

#[tokio::test(start_paused = true)]
async fn driver_fires_due_timeouts() {
    let clock = FakeClock::new();
    let timeouts: SharedTimeouts = Arc::new(Mutex::new(Timeouts::new(clock.clone())));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = Arc::clone(&fired);
        let mut t = timeouts.lock().unwrap();
        t.schedule(Schedule::after(5).key("expire".to_string()).run(move || {
            fired.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    }

    let driver = tokio::spawn(drive(Arc::clone(&timeouts), shutdown_rx));

    // Not due yet: let the driver poll a few times first
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    clock.advance_secs(5);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    shutdown_tx.send(true).unwrap();
    driver.await.unwrap();
    assert!(timeouts.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn callbacks_may_reschedule_through_the_shared_scheduler() {
    let clock = FakeClock::new();
    let timeouts: SharedTimeouts = Arc::new(Mutex::new(Timeouts::new(clock.clone())));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = Arc::clone(&fired);
        let shared = Arc::clone(&timeouts);
        let mut t = timeouts.lock().unwrap();
        // The callback locks the scheduler it was fired from and re-arms
        // its own key
        t.schedule(Schedule::after(5).key("lease".to_string()).run(move || {
            fired.fetch_add(1, Ordering::SeqCst);
            let fired = Arc::clone(&fired);
            shared
                .lock()
                .unwrap()
                .schedule(Schedule::after(5).key("lease".to_string()).run(move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }))
        .unwrap();
    }

    let driver = tokio::spawn(drive(Arc::clone(&timeouts), shutdown_rx));

    clock.advance_secs(5);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(
        timeouts.lock().unwrap().has(&"lease".to_string()).is_some(),
        "follow-up action registered under the freed key"
    );

    clock.advance_secs(5);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 2);

    shutdown_tx.send(true).unwrap();
    driver.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn driver_stops_on_shutdown() {
    let clock = FakeClock::new();
    let timeouts: SharedTimeouts = Arc::new(Mutex::new(Timeouts::new(clock)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = tokio::spawn(drive(timeouts, shutdown_rx));
    shutdown_tx.send(true).unwrap();
    driver.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn driver_stops_when_sender_is_dropped() {
    let clock = FakeClock::new();
    let timeouts: SharedTimeouts = Arc::new(Mutex::new(Timeouts::new(clock)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = tokio::spawn(drive(timeouts, shutdown_rx));
    drop(shutdown_tx);
    driver.await.unwrap();
}
