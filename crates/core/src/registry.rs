// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name-indexed registries for daemon objects
//!
//! Subsystems keep their runtime objects (services, zones, ipsets) in a
//! [`Registry`]. An owner that schedules timed actions for its objects tags
//! them with the object's [`crate::ident::OwnerTag`] and calls
//! `Timeouts::cancel_tags` with that tag before removing the object, so no
//! pending callback outlives its owner.

use std::collections::BTreeMap;

use crate::error::RegistryError;

/// Objects a registry can hold
pub trait Named {
    fn name(&self) -> &str;
}

/// A simple name-indexed object store
#[derive(Debug, Clone, Default)]
pub struct Registry<V> {
    kind: &'static str,
    objects: BTreeMap<String, V>,
}

impl<V: Named> Registry<V> {
    /// `kind` names the object class in error messages ("service", "zone")
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            objects: BTreeMap::new(),
        }
    }

    /// Insert an object under its own name, replacing any previous one
    pub fn add(&mut self, object: V) -> Option<V> {
        self.objects.insert(object.name().to_string(), object)
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.objects.get(name)
    }

    /// Like [`Registry::get`], but absence is an error
    pub fn check(&self, name: &str) -> Result<&V, RegistryError> {
        self.objects.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Remove an object, returning it; unknown names are an error
    pub fn remove(&mut self, name: &str) -> Result<V, RegistryError> {
        self.objects
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.objects.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
