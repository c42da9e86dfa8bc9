//! File-backed registry of top-level groups.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use ansiblereg_core::{Identity, RegistryError, RegistryResult};
use ansiblereg_inventory::{Entry, Group, Registry};

use crate::atomic::write_atomic;

/// File name of the registry inside its storage location.
pub const DATABASE_FILE_NAME: &str = "ansiblereg.json";

/// Registry bound to `<storage location>/ansiblereg.json`.
///
/// Nothing touches the disk until [`Database::load`] or [`Database::commit`].
/// The type does no locking of its own; see [`crate::session`].
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    registry: Registry,
}

impl Database {
    pub fn new(storage_location: impl AsRef<Path>) -> Self {
        Self {
            path: storage_location.as_ref().join(DATABASE_FILE_NAME),
            registry: Registry::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff the backing file is present.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn add_group(&mut self, group: Group) -> RegistryResult<()> {
        self.registry.add_group(group)
    }

    pub fn update_group(&mut self, group: Group) {
        self.registry.update_group(group)
    }

    /// Idempotent: removing an absent group returns `None`.
    pub fn remove_group(&mut self, id: &Identity) -> Option<Group> {
        self.registry.remove_group(id)
    }

    pub fn group(&self, id: &Identity) -> Option<&Group> {
        self.registry.group(id)
    }

    pub fn group_mut(&mut self, id: &Identity) -> Option<&mut Group> {
        self.registry.group_mut(id)
    }

    pub fn find_group_by_name(&self, name: &str) -> RegistryResult<&Group> {
        self.registry.find_group_by_name(name)
    }

    pub fn find_entry_by_identity(&self, id: &Identity) -> RegistryResult<(&Group, &Entry)> {
        self.registry.find_entry_by_identity(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.registry.groups()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Serialize the whole registry (tab-indented JSON) and replace the backing file.
    pub fn commit(&self) -> RegistryResult<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.registry.serialize(&mut serializer).map_err(|e| {
            RegistryError::serialization(format!(
                "failed to serialize database '{}': {e}",
                self.path.display()
            ))
        })?;

        write_atomic(&self.path, &buf)?;
        debug!(path = %self.path.display(), groups = self.registry.len(), "committed database");
        Ok(())
    }

    /// Replace the in-memory registry with the backing file's contents.
    ///
    /// A missing or empty file yields an empty registry.
    pub fn load(&mut self) -> RegistryResult<()> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "database file not found; starting empty");
                self.registry = Registry::new();
                return Ok(());
            }
            Err(e) => {
                return Err(RegistryError::io(format!(
                    "failed to load database file '{}': {e}",
                    self.path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            self.registry = Registry::new();
            return Ok(());
        }

        self.registry = serde_json::from_str(&text).map_err(|e| {
            RegistryError::deserialization(format!(
                "failed to deserialize database '{}': {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), groups = self.registry.len(), "loaded database");
        Ok(())
    }
}
