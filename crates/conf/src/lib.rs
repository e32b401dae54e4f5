// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fwd-conf: the daemon's key=value configuration file layer
//!
//! This crate provides:
//! - The schema of valid configuration keys with typed normalization
//! - The ReloadPolicy value grammar
//! - Reading and atomically rewriting the configuration file, preserving
//!   comments and layout

pub mod error;
pub mod file;
pub mod reload_policy;
pub mod schema;

pub use error::ConfError;
pub use file::DaemonConf;
pub use reload_policy::{ChainPolicy, ReloadPolicy, ReloadPolicyError};
pub use schema::{lookup, str_to_bool, KeySpec, ValueKind, DEPRECATED_KEYS, VALID_KEYS};
