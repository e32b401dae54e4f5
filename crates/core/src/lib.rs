// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fwd-core: core library for the fwd zone firewall daemon
//!
//! This crate provides:
//! - A deferred-action timeout scheduler keyed by stable identities,
//!   with tag-based bulk cancellation
//! - The timer primitive and delay normalization it sits on
//! - Value identities for zones and policies
//! - Name-indexed registries for daemon objects
//! - An async driver loop that ticks the scheduler on the host event loop

pub mod clock;
pub mod delay;
pub mod drive;
pub mod error;
pub mod ident;
pub mod queue;
pub mod registry;
pub mod timeout;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use delay::{Delay, DelayValue, TimerDelay};
pub use drive::drive;
pub use error::{RegistryError, TimeoutError};
pub use ident::{Direction, Ident, OwnerTag, SpecialZone};
pub use queue::{TimerId, TimerQueue};
pub use registry::{Named, Registry};
pub use timeout::{invoke, Callback, Schedule, TimeoutHandle, Timeouts};
