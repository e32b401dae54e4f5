// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ReloadPolicy` configuration value
//!
//! Controls what the base chains do with packets while the ruleset is being
//! rebuilt during a reload. The value is either a single policy applied to
//! all three chains (`ACCEPT`) or a per-chain list (`INPUT:DROP,FORWARD:DROP,
//! OUTPUT:ACCEPT`). Parsing is case-insensitive and accepts `;` as a list
//! separator and `=` as a chain/policy separator; [`ReloadPolicy::to_string`]
//! always renders the canonical uppercase `,`/`:` form.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid ReloadPolicy: '{0}'")]
pub struct ReloadPolicyError(pub String);

/// What a base chain does with packets during a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainPolicy {
    Accept,
    Reject,
    #[default]
    Drop,
}

impl ChainPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainPolicy::Accept => "ACCEPT",
            ChainPolicy::Reject => "REJECT",
            ChainPolicy::Drop => "DROP",
        }
    }
}

impl fmt::Display for ChainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainPolicy {
    type Err = ReloadPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACCEPT" => Ok(ChainPolicy::Accept),
            "REJECT" => Ok(ChainPolicy::Reject),
            "DROP" => Ok(ChainPolicy::Drop),
            _ => Err(ReloadPolicyError(s.to_string())),
        }
    }
}

/// Per-chain reload policies. The default drops on all chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadPolicy {
    pub input: ChainPolicy,
    pub forward: ChainPolicy,
    pub output: ChainPolicy,
}

impl ReloadPolicy {
    pub fn uniform(policy: ChainPolicy) -> Self {
        Self {
            input: policy,
            forward: policy,
            output: policy,
        }
    }
}

impl FromStr for ReloadPolicy {
    type Err = ReloadPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Ok(ReloadPolicy::default());
        }

        // A bare policy applies to all chains
        if let Ok(policy) = value.parse::<ChainPolicy>() {
            return Ok(ReloadPolicy::uniform(policy));
        }

        let mut result = ReloadPolicy::default();
        for item in value.replace(';', ",").split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let pair: Vec<&str> = item.split([':', '=']).collect();
            let [chain, policy] = pair.as_slice() else {
                return Err(ReloadPolicyError(s.to_string()));
            };
            let policy: ChainPolicy = policy
                .parse()
                .map_err(|_| ReloadPolicyError(s.to_string()))?;
            match chain.trim().to_uppercase().as_str() {
                "INPUT" => result.input = policy,
                "FORWARD" => result.forward = policy,
                "OUTPUT" => result.output = policy,
                _ => return Err(ReloadPolicyError(s.to_string())),
            }
        }
        Ok(result)
    }
}

impl fmt::Display for ReloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INPUT:{},FORWARD:{},OUTPUT:{}",
            self.input, self.forward, self.output
        )
    }
}

#[cfg(test)]
#[path = "reload_policy_tests.rs"]
mod tests;
