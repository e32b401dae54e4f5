// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's key=value configuration file
//!
//! [`DaemonConf`] holds the parsed key/value pairs in file order. Reading is
//! forgiving: malformed lines, unknown keys, and invalid values are logged
//! and replaced by defaults rather than aborting daemon startup. Writing
//! rewrites the file in place through a temporary file, preserving comments
//! and untouched lines, keeping a `.old` backup, and skipping the rewrite
//! entirely when nothing changed.

use std::fs::{self, File, Permissions};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tracing::error;

use crate::error::ConfError;
use crate::schema::{lookup, DEPRECATED_KEYS, VALID_KEYS};

/// In-memory view of the configuration file
#[derive(Debug, Clone)]
pub struct DaemonConf {
    path: PathBuf,
    values: Vec<(String, String)>,
}

impl DaemonConf {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, keeping its position if it already exists
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.values.push((key.to_string(), value.to_string())),
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Load the built-in defaults for every key
    pub fn set_defaults(&mut self) {
        self.clear();
        for spec in VALID_KEYS {
            self.set(spec.key, &spec.default_value());
        }
    }

    /// Lenient-normalize every schema key, filling in defaults for keys the
    /// file did not provide
    fn normalize(&mut self) {
        for spec in VALID_KEYS {
            let current = self.get(spec.key).map(str::to_string);
            let normalized = spec.normalize_lossy(current.as_deref());
            if current.as_deref() != Some(normalized.as_str()) {
                self.set(spec.key, &normalized);
            }
        }
    }

    /// Read the configuration file.
    ///
    /// A file that cannot be opened leaves the defaults loaded and returns
    /// the error; the caller decides whether that is fatal.
    pub fn read(&mut self) -> Result<(), ConfError> {
        self.clear();
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to open configuration file");
                self.set_defaults();
                return Err(err.into());
            }
        };

        for line in BufReader::new(file).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let pair: Vec<&str> = line.split('=').map(str::trim).collect();
            let [key, value] = pair.as_slice() else {
                error!(line, "invalid option definition");
                continue;
            };
            if lookup(key).is_none() {
                error!(key, "unknown configuration key");
                continue;
            }
            if value.is_empty() {
                error!(key, "missing configuration value");
                continue;
            }
            if self.get(key).is_some() {
                error!(key, "duplicate configuration key");
                continue;
            }
            self.values.push((key.to_string(), value.to_string()));
        }

        self.normalize();
        Ok(())
    }

    /// Rewrite the configuration file to match the in-memory values.
    ///
    /// Comments and unchanged lines of the existing file are carried over,
    /// duplicate key lines are dropped, and missing keys are appended. The
    /// previous content is kept as `<path>.old`, and the file is replaced
    /// atomically with mode 0600. If nothing would change, the file is left
    /// untouched.
    pub fn write(&self) -> Result<(), ConfError> {
        if self.values.is_empty() {
            return Ok(());
        }

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::DirBuilder::new().recursive(true).mode(0o750).create(dir)?;
        }

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(
                "{}.",
                self.path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "conf".to_string())
            ))
            .tempfile_in(if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir
            })?;

        let mut done: Vec<String> = Vec::new();
        let mut modified = false;
        let mut last_line_blank = false;

        match File::open(&self.path) {
            Ok(file) => {
                for line in BufReader::new(file).lines() {
                    let line = line?;
                    if line.trim().is_empty() {
                        // Collapse runs of blank lines
                        if !last_line_blank {
                            writeln!(temp)?;
                            last_line_blank = true;
                        }
                        continue;
                    }
                    last_line_blank = false;
                    if line.trim_start().starts_with('#') || line.trim_start().starts_with(';') {
                        writeln!(temp, "{line}")?;
                        continue;
                    }
                    let pair: Vec<&str> = line.split('=').collect();
                    let [key, value] = pair.as_slice() else {
                        writeln!(temp, "{line}")?;
                        continue;
                    };
                    let key = key.trim();
                    let value = value.trim();
                    if done.iter().any(|k| k == key) {
                        // Drop repeated key lines
                        modified = true;
                        continue;
                    }
                    match self.get(key) {
                        Some(current) if current != value => {
                            writeln!(temp, "{key}={current}")?;
                            modified = true;
                        }
                        _ => writeln!(temp, "{line}")?,
                    }
                    done.push(key.to_string());
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to open configuration file");
                return Err(err.into());
            }
        }

        for (key, value) in &self.values {
            if done.iter().any(|k| k == key) {
                continue;
            }
            if DEPRECATED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if !last_line_blank {
                // One blank line between carried-over content and additions
                writeln!(temp)?;
                last_line_blank = true;
            }
            writeln!(temp, "{key}={value}")?;
            modified = true;
        }

        if !modified {
            // Dropping the temp file removes it
            return Ok(());
        }

        if self.path.exists() {
            let mut backup = self.path.clone().into_os_string();
            backup.push(".old");
            fs::copy(&self.path, &backup).map_err(|source| ConfError::Backup {
                path: self.path.clone(),
                source,
            })?;
        }

        temp.persist(&self.path).map_err(|err| ConfError::Persist {
            path: self.path.clone(),
            source: err.error,
        })?;
        fs::set_permissions(&self.path, Permissions::from_mode(0o600))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
