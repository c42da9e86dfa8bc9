//! Inventory directories on disk.
//!
//! One inventory lives at `<root>/<identity>/` and holds:
//! - `ansiblereg.json` (the [`Database`])
//! - `hosts.ini` (the rendered inventory)
//! - `group_vars/all.yml` (opaque group variables text)

pub mod map;

pub use map::InventoryMap;

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use ansiblereg_core::{Identity, RegistryError, RegistryResult};

use crate::atomic::write_atomic;
use crate::database::Database;
use crate::export::HOSTS_FILE_NAME;

pub const GROUP_VARS_DIR: &str = "group_vars";
pub const GROUP_VARS_FILE: &str = "all.yml";

/// Handle to one inventory directory. Its id is the directory path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    id: String,
    root: PathBuf,
    path: PathBuf,
}

impl Inventory {
    /// A new inventory with a fresh identity beneath `root`. Nothing is created on disk.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = normalize(root.as_ref());
        let path = root.join(Identity::generate().as_str());
        Self {
            id: path.to_string_lossy().into_owned(),
            root,
            path,
        }
    }

    /// Rebuild the handle from an id previously returned by [`Inventory::id`].
    pub fn from_id(id: &str) -> Self {
        let path = normalize(Path::new(id));
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            id: path.to_string_lossy().into_owned(),
            root,
            path,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hosts_file(&self) -> PathBuf {
        self.path.join(HOSTS_FILE_NAME)
    }

    pub fn group_vars_file(&self) -> PathBuf {
        self.path.join(GROUP_VARS_DIR).join(GROUP_VARS_FILE)
    }

    /// Load this inventory's database; a brand-new inventory yields an empty one.
    pub fn open_database(&self) -> RegistryResult<Database> {
        let mut db = Database::new(&self.path);
        db.load()?;
        Ok(db)
    }

    /// Create the directory layout and write `group_vars/all.yml`.
    pub fn commit(&self, group_vars: &str) -> RegistryResult<()> {
        let dir = self.path.join(GROUP_VARS_DIR);
        fs::create_dir_all(&dir).map_err(|e| {
            RegistryError::io(format!("failed to create inventory path '{}': {e}", dir.display()))
        })?;
        write_atomic(&self.group_vars_file(), group_vars.as_bytes())?;
        debug!(inventory = %self.id, "committed group vars");
        Ok(())
    }

    /// Read `group_vars/all.yml`.
    pub fn load(&self) -> RegistryResult<String> {
        let file = self.group_vars_file();
        fs::read_to_string(&file).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                RegistryError::not_found(format!("group vars file '{}'", file.display()))
            }
            _ => RegistryError::io(format!("failed to read '{}': {e}", file.display())),
        })
    }

    /// Remove the whole inventory directory. An absent directory is not an error.
    pub fn delete(&self) -> RegistryResult<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                debug!(inventory = %self.id, "deleted inventory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RegistryError::io(format!(
                "failed to delete inventory '{}': {e}",
                self.path.display()
            ))),
        }
    }
}

// Lexical cleanup only: drops `.` segments and trailing separators.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
