// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading and writing the configuration file
#[derive(Debug, Error)]
pub enum ConfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("backup of '{path}' failed: {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create '{path}': {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}
