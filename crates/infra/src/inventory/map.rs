use std::collections::HashMap;

use ansiblereg_core::{RegistryError, RegistryResult};

use super::Inventory;

/// Inventories known to this process, keyed by inventory id.
#[derive(Debug, Default)]
pub struct InventoryMap {
    inner: HashMap<String, Inventory>,
}

impl InventoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, inventory: Inventory) -> RegistryResult<()> {
        if self.inner.contains_key(inventory.id()) {
            return Err(RegistryError::duplicate(format!("inventory '{}'", inventory.id())));
        }
        self.inner.insert(inventory.id().to_string(), inventory);
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> RegistryResult<Inventory> {
        self.inner
            .remove(id)
            .ok_or_else(|| RegistryError::not_found(format!("inventory '{id}'")))
    }

    pub fn get(&self, id: &str) -> RegistryResult<&Inventory> {
        self.inner
            .get(id)
            .ok_or_else(|| RegistryError::not_found(format!("inventory '{id}'")))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    /// Return the known inventory, or rebuild it from its id and remember it.
    pub fn get_or_create(&mut self, id: &str) -> &Inventory {
        let inventory = Inventory::from_id(id);
        self.inner.entry(inventory.id().to_string()).or_insert(inventory)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
