// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema of the daemon configuration keys
//!
//! Every key the configuration file may contain is listed in [`VALID_KEYS`]
//! with its value kind and built-in default. Normalization turns a raw file
//! value into canonical form; the lossy variant never fails and falls back
//! to the default, which is how the daemon survives a hand-edited file.

use tracing::warn;

use crate::error::ConfError;
use crate::reload_policy::ReloadPolicy;

/// Accepted spellings of a boolean configuration value
pub fn str_to_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// How a key's value is validated and canonicalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// yes/no (also accepts y/n, true/false, 1/0)
    Bool,
    /// Integer
    Int,
    /// Free-form non-empty string
    Str,
    /// One of a fixed set of lowercase words
    Enum(&'static [&'static str]),
    /// The [`ReloadPolicy`] grammar
    ReloadPolicy,
}

/// One entry of the configuration schema
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub key: &'static str,
    pub kind: ValueKind,
    pub default: &'static str,
}

impl KeySpec {
    const fn new(key: &'static str, kind: ValueKind, default: &'static str) -> Self {
        Self { key, kind, default }
    }

    /// The built-in default, in canonical form
    pub fn default_value(&self) -> String {
        match self.canonicalize(self.default) {
            Some(value) => value,
            // Defaults in VALID_KEYS are canonical by construction
            None => self.default.to_string(),
        }
    }

    /// Canonical form of `value`, or `None` if it is invalid for this key
    fn canonicalize(&self, value: &str) -> Option<String> {
        let value = value.trim();
        match self.kind {
            ValueKind::Bool => str_to_bool(value).map(|b| if b { "yes" } else { "no" }.to_string()),
            ValueKind::Int => value.parse::<i64>().ok().map(|n| n.to_string()),
            ValueKind::Str => (!value.is_empty()).then(|| value.to_string()),
            ValueKind::Enum(choices) => {
                let lowered = value.to_lowercase();
                choices
                    .iter()
                    .find(|choice| **choice == lowered)
                    .map(|choice| (*choice).to_string())
            }
            ValueKind::ReloadPolicy => value
                .parse::<ReloadPolicy>()
                .ok()
                .map(|policy| policy.to_string()),
        }
    }

    /// Normalize `value` strictly: invalid values are an error
    pub fn normalize(&self, value: &str) -> Result<String, ConfError> {
        self.canonicalize(value).ok_or_else(|| ConfError::InvalidValue {
            key: self.key.to_string(),
            value: value.to_string(),
        })
    }

    /// Normalize `value` leniently: invalid or missing values become the
    /// default. Invalid values are logged; missing ones are not.
    pub fn normalize_lossy(&self, value: Option<&str>) -> String {
        match value {
            None => self.default_value(),
            Some(value) => match self.canonicalize(value) {
                Some(normalized) => normalized,
                None => {
                    warn!(
                        key = self.key,
                        value, "invalid configuration value, falling back to default"
                    );
                    self.default_value()
                }
            },
        }
    }
}

pub const LOG_DENIED_VALUES: &[&str] = &["all", "unicast", "broadcast", "multicast", "off"];
pub const AUTOMATIC_HELPERS_VALUES: &[&str] = &["yes", "no", "system"];
pub const FIREWALL_BACKEND_VALUES: &[&str] = &["nftables", "iptables"];

/// Every key the configuration file may contain
pub const VALID_KEYS: &[KeySpec] = &[
    KeySpec::new("DefaultZone", ValueKind::Str, "public"),
    KeySpec::new("MinimalMark", ValueKind::Int, "100"),
    KeySpec::new("CleanupOnExit", ValueKind::Bool, "yes"),
    KeySpec::new("CleanupModulesOnExit", ValueKind::Bool, "no"),
    KeySpec::new("Lockdown", ValueKind::Bool, "no"),
    KeySpec::new("IPv6_rpfilter", ValueKind::Bool, "yes"),
    KeySpec::new("IndividualCalls", ValueKind::Bool, "no"),
    KeySpec::new("LogDenied", ValueKind::Enum(LOG_DENIED_VALUES), "off"),
    KeySpec::new(
        "AutomaticHelpers",
        ValueKind::Enum(AUTOMATIC_HELPERS_VALUES),
        "system",
    ),
    KeySpec::new(
        "FirewallBackend",
        ValueKind::Enum(FIREWALL_BACKEND_VALUES),
        "nftables",
    ),
    KeySpec::new("FlushAllOnReload", ValueKind::Bool, "yes"),
    KeySpec::new(
        "ReloadPolicy",
        ValueKind::ReloadPolicy,
        "INPUT:DROP,FORWARD:DROP,OUTPUT:DROP",
    ),
    KeySpec::new("RFC3964_IPv4", ValueKind::Bool, "yes"),
    KeySpec::new("AllowZoneDrifting", ValueKind::Bool, "no"),
    KeySpec::new("NftablesFlowtable", ValueKind::Str, "off"),
    KeySpec::new("NftablesCounters", ValueKind::Bool, "no"),
];

/// Keys still read for compatibility but no longer written back
pub const DEPRECATED_KEYS: &[&str] = &["MinimalMark", "AutomaticHelpers", "AllowZoneDrifting"];

pub fn lookup(key: &str) -> Option<&'static KeySpec> {
    VALID_KEYS.iter().find(|spec| spec.key == key)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
