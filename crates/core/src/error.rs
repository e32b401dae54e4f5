// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the core scheduling facilities

use thiserror::Error;

/// Errors raised synchronously by `Timeouts::schedule`
///
/// Both variants are reported before any scheduler state is touched, so a
/// failed `schedule` call leaves the key registry and tag index unchanged.
#[derive(Debug, Error)]
pub enum TimeoutError {
    /// The delay was negative, non-numeric, or otherwise unusable
    #[error("timeout expects a non-negative number but is '{0}'")]
    InvalidTimeout(String),
    /// The schedule request carried no callback
    #[error("schedule request has no callback")]
    MissingCallback,
}

/// Errors from name-indexed registries
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid {kind}: {name}")]
    NotFound { kind: &'static str, name: String },
}
