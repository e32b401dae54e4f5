// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identities for zones, policies, and zone policies
//!
//! Different entity kinds can share a name: a user-created zone called "ANY"
//! is not the special zone ANY. [`Ident`] carries the kind alongside the
//! name so it can serve as a map key (and as a scheduler key or tag) in
//! place of the bare name. Values are immutable and totally ordered, grouped
//! by kind: special zones, then zones, then policies, then zone policies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The built-in zones every configuration has
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpecialZone {
    Any,
    Host,
}

impl SpecialZone {
    pub fn name(self) -> &'static str {
        match self {
            SpecialZone::Any => "ANY",
            SpecialZone::Host => "HOST",
        }
    }
}

impl fmt::Display for SpecialZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Traffic direction of a zone policy, relative to the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    To,
    From,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::To => f.write_str("to"),
            Direction::From => f.write_str("from"),
        }
    }
}

/// Identity of a zone, policy, or derived zone policy.
///
/// Names are assumed non-empty; construction does not validate them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ident {
    Special(SpecialZone),
    Zone(String),
    Policy(String),
    ZonePolicy {
        zone: String,
        direction: Direction,
        special: SpecialZone,
    },
}

impl Ident {
    pub const ANY: Ident = Ident::Special(SpecialZone::Any);
    pub const HOST: Ident = Ident::Special(SpecialZone::Host);

    pub fn zone(name: impl Into<String>) -> Self {
        Ident::Zone(name.into())
    }

    /// The "public" zone shipped with every installation
    pub fn zone_public() -> Self {
        Ident::zone("public")
    }

    /// The "external" zone shipped with every installation
    pub fn zone_external() -> Self {
        Ident::zone("external")
    }

    /// The "block" zone shipped with every installation
    pub fn zone_block() -> Self {
        Ident::zone("block")
    }

    pub fn policy(name: impl Into<String>) -> Self {
        Ident::Policy(name.into())
    }

    pub fn zone_policy(
        zone: impl Into<String>,
        direction: Direction,
        special: SpecialZone,
    ) -> Self {
        Ident::ZonePolicy {
            zone: zone.into(),
            direction,
            special,
        }
    }

    pub fn is_zone(&self) -> bool {
        matches!(self, Ident::Zone(_))
    }

    pub fn is_special_zone(&self) -> bool {
        matches!(self, Ident::Special(_))
    }

    pub fn is_policy(&self) -> bool {
        matches!(self, Ident::Policy(_))
    }

    pub fn is_zone_policy(&self) -> bool {
        matches!(self, Ident::ZonePolicy { .. })
    }

    /// Zones in the wide sense: user zones and the special zones
    pub fn is_any_zone(&self) -> bool {
        matches!(self, Ident::Zone(_) | Ident::Special(_))
    }

    /// Policies in the wide sense: user policies and derived zone policies
    pub fn is_any_policy(&self) -> bool {
        matches!(self, Ident::Policy(_) | Ident::ZonePolicy { .. })
    }

    /// Source and destination zone names of a zone policy
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match self {
            Ident::ZonePolicy {
                zone,
                direction,
                special,
            } => Some(match direction {
                Direction::To => (zone.as_str(), special.name()),
                Direction::From => (special.name(), zone.as_str()),
            }),
            _ => None,
        }
    }

    /// The entity's name. Zone policies get a synthetic `zone_{from}_{to}`
    /// name derived from their endpoints.
    pub fn name(&self) -> String {
        match self {
            Ident::Special(special) => special.name().to_string(),
            Ident::Zone(name) | Ident::Policy(name) => name.clone(),
            Ident::ZonePolicy { .. } => {
                // endpoints() is Some for every ZonePolicy
                let (from, to) = self.endpoints().unwrap_or(("", ""));
                format!("zone_{from}_{to}")
            }
        }
    }

    /// The four derived policies every zone carries, in activation order
    pub fn zone_policy_directions() -> [(Direction, SpecialZone); 4] {
        [
            (Direction::To, SpecialZone::Host),
            (Direction::From, SpecialZone::Host),
            (Direction::To, SpecialZone::Any),
            (Direction::From, SpecialZone::Any),
        ]
    }

    /// Enumerate the derived zone policies of `zone`
    pub fn zone_policies(zone: impl Into<String>) -> impl Iterator<Item = Ident> {
        let zone = zone.into();
        Self::zone_policy_directions()
            .into_iter()
            .map(move |(direction, special)| Ident::zone_policy(zone.clone(), direction, special))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Special(special) => write!(f, "SpecialZone({special})"),
            Ident::Zone(name) => write!(f, "Zone({name})"),
            Ident::Policy(name) => write!(f, "Policy({name})"),
            Ident::ZonePolicy {
                zone,
                direction,
                special,
            } => write!(f, "ZonePolicy({zone} {direction} {special})"),
        }
    }
}

/// Tag identifying the container that owns a scheduled action.
///
/// Subsystems tag their pending timeouts with the owner's identity;
/// destroying the owner bulk-cancels the group so no orphaned callback fires
/// against an already-removed container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerTag {
    Service(String),
    Entity(Ident),
}

#[cfg(test)]
#[path = "ident_tests.rs"]
mod tests;
