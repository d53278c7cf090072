//! Group Registry
//!
//! Owns the groups of one process and resolves them by name.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::group::Group;

// == Group Registry ==
/// Name-to-group table shared between the application and the peer server.
///
/// Lookups take a shared lock; registration takes the exclusive one.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Adds a group under its name and returns the shared handle.
    ///
    /// Registering a name that already exists replaces the previous group.
    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        let previous = self
            .groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(group.name().to_string(), group.clone());

        if previous.is_some() {
            warn!(group = %group.name(), "group replaced");
        } else {
            info!(group = %group.name(), "group registered");
        }
        group
    }

    // == Get ==
    /// Returns the group registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    // == Remove ==
    pub fn remove(&self, name: &str) -> Option<Arc<Group>> {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Drops every group.
    pub fn clear(&self) {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
