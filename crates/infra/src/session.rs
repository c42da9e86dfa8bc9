//! Serialized load → mutate → commit → export sequences.
//!
//! The registry types have no locking of their own. A lifecycle host creates
//! one [`InventoryLock`], shares it across every caller touching the same
//! storage root, and runs each sequence through [`mutate`] or [`read`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ansiblereg_core::RegistryResult;

use crate::database::Database;
use crate::export::commit_and_export;
use crate::inventory::Inventory;

/// Process-wide mutual exclusion for inventory mutation sequences.
#[derive(Debug, Clone, Default)]
pub struct InventoryLock {
    inner: Arc<Mutex<()>>,
}

impl InventoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the lock is held. The guard releases it on drop.
    ///
    /// The lock protects no data of its own, so a poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load the inventory's database, apply `f`, then commit and export.
///
/// Nothing is persisted when `f` fails. A failed commit or export is returned
/// as-is; the caller decides whether to retry the whole sequence.
pub fn mutate<T, F>(lock: &InventoryLock, inventory: &Inventory, f: F) -> RegistryResult<T>
where
    F: FnOnce(&mut Database) -> RegistryResult<T>,
{
    let _guard = lock.lock();
    let mut db = inventory.open_database()?;
    let out = f(&mut db)?;
    commit_and_export(&db, &inventory.hosts_file())?;
    Ok(out)
}

/// Load the inventory's database under the lock and inspect it with `f`.
pub fn read<T, F>(lock: &InventoryLock, inventory: &Inventory, f: F) -> RegistryResult<T>
where
    F: FnOnce(&Database) -> RegistryResult<T>,
{
    let db = {
        let _guard = lock.lock();
        inventory.open_database()?
    };
    f(&db)
}
