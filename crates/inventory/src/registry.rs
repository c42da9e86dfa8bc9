//! Identity-keyed set of top-level groups.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use ansiblereg_core::{Entity, Identity, RegistryError, RegistryResult};

use crate::entry::Entry;
use crate::group::Group;

/// Top-level groups keyed by identity, in insertion order.
///
/// Persisted as a JSON object of `group-id -> group document`. On load the
/// group's own `id` field wins over the object key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    groups: IndexMap<Identity, Group>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new group. Fails without mutating if its identity is already present.
    pub fn add_group(&mut self, group: Group) -> RegistryResult<()> {
        if self.groups.contains_key(group.id()) {
            return Err(RegistryError::duplicate(format!(
                "group '{}' ({})",
                group.name(),
                group.id()
            )));
        }
        self.groups.insert(group.id().clone(), group);
        Ok(())
    }

    /// Insert or replace a group by identity.
    pub fn update_group(&mut self, group: Group) {
        self.groups.insert(group.id().clone(), group);
    }

    /// Remove a group by identity. Removing an absent group is a no-op.
    pub fn remove_group(&mut self, id: &Identity) -> Option<Group> {
        self.groups.shift_remove(id)
    }

    pub fn group(&self, id: &Identity) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn group_mut(&mut self, id: &Identity) -> Option<&mut Group> {
        self.groups.get_mut(id)
    }

    /// First group whose name matches.
    pub fn find_group_by_name(&self, name: &str) -> RegistryResult<&Group> {
        self.groups
            .values()
            .find(|g| g.name() == name)
            .ok_or_else(|| RegistryError::not_found(format!("group named '{name}'")))
    }

    /// Resolve an entity identity to its owning top-level group.
    ///
    /// Only direct members of top-level groups are searched; entries of nested
    /// groups are not.
    pub fn find_entry_by_identity(&self, id: &Identity) -> RegistryResult<(&Group, &Entry)> {
        self.groups
            .values()
            .find_map(|g| g.entry(id).map(|e| (g, e)))
            .ok_or_else(|| RegistryError::not_found(format!("entry '{id}'")))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for Registry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.groups.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Registry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Group>::deserialize(deserializer)?;
        let mut registry = Registry::new();
        for (key, group) in raw {
            if key != group.id().as_str() {
                warn!(
                    key = %key,
                    group = %group.id(),
                    "registry key does not match group id; using group id"
                );
            }
            if let Err(e) = registry.add_group(group) {
                warn!(error = %e, "skipping duplicate group");
            }
        }
        Ok(registry)
    }
}
