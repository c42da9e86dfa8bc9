//! Create/read/update/delete lifecycle for inventories, groups and hosts.
//!
//! Each call is one locked sequence: load the inventory's database, apply one
//! change, commit, re-export `hosts.ini`.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, instrument};

use ansiblereg_core::{Entity, Identity, RegistryError, RegistryResult};
use ansiblereg_inventory::{Entry, Group, Host, Variables};

use crate::config::ProviderConfig;
use crate::inventory::{Inventory, InventoryMap};
use crate::session::{self, InventoryLock};

/// Requested changes to an existing host. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostChanges {
    pub name: Option<String>,
    /// Move the host into this top-level group.
    pub group: Option<Identity>,
    /// Merged into the existing variables, overwriting per key.
    pub variables: Option<Variables>,
}

impl HostChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.group.is_none() && self.variables.is_none()
    }
}

pub struct InventoryService {
    config: ProviderConfig,
    lock: InventoryLock,
    inventories: RwLock<InventoryMap>,
}

impl InventoryService {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_lock(config, InventoryLock::new())
    }

    /// Share an existing lock with other services over the same root.
    pub fn with_lock(config: ProviderConfig, lock: InventoryLock) -> Self {
        Self {
            config,
            lock,
            inventories: RwLock::new(InventoryMap::new()),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn inventory(&self, id: &str) -> Inventory {
        let mut map = self.inventories.write().unwrap_or_else(PoisonError::into_inner);
        map.get_or_create(id).clone()
    }

    // ---- inventories ----

    #[instrument(skip(self, group_vars), fields(root = %self.config.path.display()), err)]
    pub fn create_inventory(&self, group_vars: &str) -> RegistryResult<Inventory> {
        let _guard = self.lock.lock();
        let inventory = Inventory::new(&self.config.path);
        inventory.commit(group_vars)?;
        self.inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(inventory.clone())?;
        Ok(inventory)
    }

    #[instrument(skip(self), err)]
    pub fn read_inventory(&self, id: &str) -> RegistryResult<String> {
        let inventory = self.inventory(id);
        let _guard = self.lock.lock();
        inventory.load()
    }

    #[instrument(skip(self, group_vars), err)]
    pub fn update_inventory(&self, id: &str, group_vars: &str) -> RegistryResult<()> {
        let inventory = self.inventory(id);
        let _guard = self.lock.lock();
        inventory.commit(group_vars)
    }

    #[instrument(skip(self), err)]
    pub fn delete_inventory(&self, id: &str) -> RegistryResult<()> {
        let inventory = self.inventory(id);
        let _guard = self.lock.lock();
        inventory.delete()?;
        self.inventories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .delete(inventory.id())?;
        Ok(())
    }

    // ---- groups ----

    #[instrument(skip(self), err)]
    pub fn create_group(&self, inventory: &str, name: &str) -> RegistryResult<Identity> {
        let inventory = self.inventory(inventory);
        session::mutate(&self.lock, &inventory, |db| {
            let group = Group::new(name);
            let id = group.id().clone();
            db.add_group(group)?;
            Ok(id)
        })
    }

    #[instrument(skip(self), err)]
    pub fn read_group(&self, inventory: &str, id: &Identity) -> RegistryResult<Group> {
        let inventory = self.inventory(inventory);
        session::read(&self.lock, &inventory, |db| {
            db.group(id)
                .cloned()
                .ok_or_else(|| RegistryError::not_found(format!("group '{id}'")))
        })
    }

    #[instrument(skip(self), err)]
    pub fn rename_group(&self, inventory: &str, id: &Identity, name: &str) -> RegistryResult<()> {
        let inventory = self.inventory(inventory);
        session::mutate(&self.lock, &inventory, |db| {
            let group = db
                .group_mut(id)
                .ok_or_else(|| RegistryError::not_found(format!("group '{id}'")))?;
            group.set_name(name.to_string());
            Ok(())
        })
    }

    /// Removing a group that is already gone still succeeds.
    #[instrument(skip(self), err)]
    pub fn delete_group(&self, inventory: &str, id: &Identity) -> RegistryResult<()> {
        let inventory = self.inventory(inventory);
        session::mutate(&self.lock, &inventory, |db| {
            if db.remove_group(id).is_none() {
                debug!(group = %id, "group not found; nothing to remove");
            }
            Ok(())
        })
    }

    // ---- hosts ----

    #[instrument(skip(self, variables), err)]
    pub fn create_host(
        &self,
        inventory: &str,
        group: &Identity,
        name: &str,
        variables: Variables,
    ) -> RegistryResult<Identity> {
        let inventory = self.inventory(inventory);
        session::mutate(&self.lock, &inventory, |db| {
            let group = db
                .group_mut(group)
                .ok_or_else(|| RegistryError::not_found(format!("group '{group}'")))?;
            let host = Host::with_variables(name, variables);
            let id = host.id().clone();
            group.update_entity(host);
            Ok(id)
        })
    }

    /// Returns the owning group's identity with the host.
    #[instrument(skip(self), err)]
    pub fn read_host(&self, inventory: &str, id: &Identity) -> RegistryResult<(Identity, Host)> {
        let inventory = self.inventory(inventory);
        session::read(&self.lock, &inventory, |db| {
            let (group, entry) = db.find_entry_by_identity(id)?;
            match entry {
                Entry::Host(host) => Ok((group.id().clone(), host.clone())),
                Entry::Group(_) => Err(RegistryError::not_found(format!("host '{id}'"))),
            }
        })
    }

    #[instrument(skip(self, changes), err)]
    pub fn update_host(
        &self,
        inventory: &str,
        id: &Identity,
        changes: HostChanges,
    ) -> RegistryResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let inventory = self.inventory(inventory);
        session::mutate(&self.lock, &inventory, |db| {
            let owner = match db.find_entry_by_identity(id)? {
                (group, Entry::Host(_)) => group.id().clone(),
                (_, Entry::Group(_)) => {
                    return Err(RegistryError::not_found(format!("host '{id}'")));
                }
            };
            if let Some(target) = &changes.group {
                if db.group(target).is_none() {
                    return Err(RegistryError::not_found(format!("group '{target}'")));
                }
            }

            let group = db
                .group_mut(&owner)
                .ok_or_else(|| RegistryError::not_found(format!("group '{owner}'")))?;
            let host = group
                .entity_mut(id)?
                .as_host_mut()
                .ok_or_else(|| RegistryError::not_found(format!("host '{id}'")))?;
            if let Some(name) = changes.name {
                host.set_name(name);
            }
            if let Some(variables) = changes.variables {
                host.set_variables(variables);
            }

            if let Some(target) = changes.group.filter(|t| *t != owner) {
                let entry = group
                    .remove_entity(id)
                    .ok_or_else(|| RegistryError::not_found(format!("host '{id}'")))?;
                db.group_mut(&target)
                    .ok_or_else(|| RegistryError::not_found(format!("group '{target}'")))?
                    .update_entity(entry);
            }
            Ok(())
        })
    }

    /// Removing a host that is already gone still succeeds. Nested group
    /// references are never removed through this call.
    #[instrument(skip(self), err)]
    pub fn delete_host(&self, inventory: &str, id: &Identity) -> RegistryResult<()> {
        let inventory = self.inventory(inventory);
        session::mutate(&self.lock, &inventory, |db| {
            let owner = match db.find_entry_by_identity(id) {
                Ok((group, Entry::Host(_))) => group.id().clone(),
                Ok((_, Entry::Group(_))) => {
                    debug!(entity = %id, "identity names a nested group; nothing to remove");
                    return Ok(());
                }
                Err(e) if e.is_not_found() => {
                    debug!(host = %id, "host not found; nothing to remove");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            if let Some(group) = db.group_mut(&owner) {
                group.remove_entity(id);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> InventoryService {
        InventoryService::new(ProviderConfig::new(dir.path()))
    }

    #[test]
    fn inventory_lifecycle() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);

        let inventory = svc.create_inventory("---\nansible_user: ubuntu\n").unwrap();
        assert_eq!(svc.read_inventory(inventory.id()).unwrap(), "---\nansible_user: ubuntu\n");

        svc.update_inventory(inventory.id(), "---\n").unwrap();
        assert_eq!(svc.read_inventory(inventory.id()).unwrap(), "---\n");

        svc.delete_inventory(inventory.id()).unwrap();
        assert!(!inventory.path().exists());
    }

    #[test]
    fn group_lifecycle_keeps_hosts_file_in_step() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let inventory = svc.create_inventory("---\n").unwrap();

        let id = svc.create_group(inventory.id(), "master").unwrap();
        assert_eq!(svc.read_group(inventory.id(), &id).unwrap().name(), "master");
        assert_eq!(fs::read_to_string(inventory.hosts_file()).unwrap(), "[master]\n");

        svc.rename_group(inventory.id(), &id, "control").unwrap();
        assert_eq!(fs::read_to_string(inventory.hosts_file()).unwrap(), "[control]\n");

        svc.delete_group(inventory.id(), &id).unwrap();
        svc.delete_group(inventory.id(), &id).unwrap();
        assert!(svc.read_group(inventory.id(), &id).unwrap_err().is_not_found());
        assert_eq!(fs::read_to_string(inventory.hosts_file()).unwrap(), "");
    }

    #[test]
    fn host_lifecycle() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let inventory = svc.create_inventory("---\n").unwrap();
        let master = svc.create_group(inventory.id(), "master").unwrap();
        let node = svc.create_group(inventory.id(), "node").unwrap();

        let mut variables = Variables::new();
        variables.insert("name".into(), json!("master-1"));
        let host = svc
            .create_host(inventory.id(), &master, "192.168.0.180", variables)
            .unwrap();

        let (owner, read) = svc.read_host(inventory.id(), &host).unwrap();
        assert_eq!(owner, master);
        assert_eq!(read.variable("name").unwrap(), &json!("master-1"));

        let mut extra = Variables::new();
        extra.insert("ansible_port".into(), json!(2222));
        svc.update_host(
            inventory.id(),
            &host,
            HostChanges {
                name: Some("192.168.0.190".into()),
                group: Some(node.clone()),
                variables: Some(extra),
            },
        )
        .unwrap();

        let (owner, read) = svc.read_host(inventory.id(), &host).unwrap();
        assert_eq!(owner, node);
        assert_eq!(read.name(), "192.168.0.190");
        assert_eq!(read.variables().len(), 2);
        assert!(svc.read_group(inventory.id(), &master).unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(inventory.hosts_file()).unwrap(),
            "[master]\n\n[node]\n192.168.0.190 ansible_port=2222 name=master-1\n"
        );

        svc.delete_host(inventory.id(), &host).unwrap();
        svc.delete_host(inventory.id(), &host).unwrap();
        assert!(svc.read_host(inventory.id(), &host).unwrap_err().is_not_found());
    }

    #[test]
    fn moving_to_unknown_group_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let inventory = svc.create_inventory("---\n").unwrap();
        let master = svc.create_group(inventory.id(), "master").unwrap();
        let host = svc
            .create_host(inventory.id(), &master, "192.168.0.180", Variables::new())
            .unwrap();

        let err = svc
            .update_host(
                inventory.id(),
                &host,
                HostChanges {
                    group: Some(Identity::generate()),
                    ..HostChanges::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(svc.read_host(inventory.id(), &host).unwrap().0, master);
    }

    #[test]
    fn failed_inventory_commit_is_not_remembered() {
        let dir = TempDir::new().unwrap();
        let occupied = dir.path().join("occupied");
        fs::write(&occupied, "not a directory").unwrap();
        let svc = InventoryService::new(ProviderConfig::new(&occupied));

        let err = svc.create_inventory("---\n").unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
        assert!(svc.inventories.read().unwrap().is_empty());
    }

    fn nest_child_group(
        svc: &InventoryService,
        inventory: &Inventory,
        parent: &Identity,
    ) -> Identity {
        session::mutate(&svc.lock, inventory, |db| {
            let child = Group::new("child");
            let id = child.id().clone();
            db.group_mut(parent).unwrap().add_entity(child)?;
            Ok(id)
        })
        .unwrap()
    }

    #[test]
    fn host_operations_do_not_touch_nested_groups() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let inventory = svc.create_inventory("---\n").unwrap();
        let parent = svc.create_group(inventory.id(), "k3s_cluster:children").unwrap();
        let child = nest_child_group(&svc, &inventory, &parent);

        let err = svc
            .update_host(
                inventory.id(),
                &child,
                HostChanges {
                    name: Some("renamed".into()),
                    ..HostChanges::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());

        svc.delete_host(inventory.id(), &child).unwrap();

        let group = svc.read_group(inventory.id(), &parent).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.entity(&child).unwrap().name(), "child");
    }

    #[test]
    fn create_host_in_unknown_group_fails() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let inventory = svc.create_inventory("---\n").unwrap();

        let err = svc
            .create_host(inventory.id(), &Identity::generate(), "10.0.0.1", Variables::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
