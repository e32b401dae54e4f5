//! End-to-end expiry: registry objects with timed teardown.
//!
//! Models how a subsystem uses the scheduler: every object gets an expiry
//! timeout keyed by its name and tagged with its owner, firing sends the
//! name over a channel, and removing an owner cancels its whole group.

use std::sync::mpsc;

use fwd_core::{FakeClock, Ident, Named, OwnerTag, Registry, Schedule, Timeouts};

#[derive(Debug, Clone, PartialEq)]
struct Service {
    name: String,
}

impl Service {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Named for Service {
    fn name(&self) -> &str {
        &self.name
    }
}

#[test]
fn expired_objects_are_removed_and_cancelled_ones_survive() {
    let clock = FakeClock::new();
    let mut timeouts: Timeouts<String, OwnerTag, FakeClock> = Timeouts::new(clock.clone());
    let mut registry = Registry::new("service");
    let (expired_tx, expired_rx) = mpsc::channel();

    for (name, secs) in [("dns", 5), ("ssh", 10), ("http", 10)] {
        registry.add(Service::new(name));
        let tx = expired_tx.clone();
        let name = name.to_string();
        timeouts
            .schedule(
                Schedule::after(secs)
                    .key(name.clone())
                    .tag(OwnerTag::Service(name.clone()))
                    .run(move || {
                        let _ = tx.send(name);
                    }),
            )
            .unwrap();
    }
    assert_eq!(timeouts.len(), 3);

    // Removing an object tears down its pending expiry first
    let removed = registry.remove("ssh").unwrap();
    assert_eq!(
        timeouts.cancel_tags([OwnerTag::Service(removed.name().to_string())]),
        1
    );

    clock.advance_secs(10);
    assert_eq!(timeouts.fire_due(), 2);
    for name in expired_rx.try_iter() {
        registry.remove(&name).unwrap();
    }

    assert_eq!(registry.names(), vec![] as Vec<&str>);
    assert!(timeouts.is_empty());
}

#[test]
fn rescheduling_extends_an_objects_lease() {
    let clock = FakeClock::new();
    let mut timeouts: Timeouts<String, OwnerTag, FakeClock> = Timeouts::new(clock.clone());
    let (tx, rx) = mpsc::channel();

    let schedule = |tx: mpsc::Sender<&'static str>| {
        Schedule::after(5).key("dns".to_string()).run(move || {
            let _ = tx.send("dns");
        })
    };
    let first = timeouts.schedule(schedule(tx.clone())).unwrap();

    clock.advance_secs(4);
    // Keep-alive arrives just before expiry
    let second = timeouts.schedule(schedule(tx)).unwrap();
    assert_eq!(first, second);

    clock.advance_secs(4);
    assert_eq!(timeouts.fire_due(), 0, "lease was extended");

    clock.advance_secs(1);
    assert_eq!(timeouts.fire_due(), 1);
    assert_eq!(rx.try_iter().count(), 1, "extended lease fires once");
}

#[test]
fn zone_teardown_cancels_every_derived_policy_action() {
    let clock = FakeClock::new();
    let mut timeouts: Timeouts<String, OwnerTag, FakeClock> = Timeouts::new(clock.clone());

    for ident in Ident::zone_policies("public") {
        timeouts
            .schedule(
                Schedule::after(60)
                    .key(ident.name())
                    .tag(OwnerTag::Entity(ident))
                    .run(|| {}),
            )
            .unwrap();
    }
    // An unrelated zone's action must survive the teardown
    timeouts
        .schedule(
            Schedule::after(60)
                .key("work".to_string())
                .tag(OwnerTag::Entity(Ident::zone("work")))
                .run(|| {}),
        )
        .unwrap();
    assert_eq!(timeouts.len(), 5);

    let cancelled = timeouts.cancel_tags(Ident::zone_policies("public").map(OwnerTag::Entity));
    assert_eq!(cancelled, 4);
    assert_eq!(timeouts.len(), 1);
    assert!(timeouts.has(&"work".to_string()).is_some());

    clock.advance_secs(60);
    assert_eq!(timeouts.fire_due(), 1);
}
