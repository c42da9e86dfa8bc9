//! Infrastructure layer: file persistence, export, inventory directories,
//! locking and the lifecycle service.

mod atomic;

pub mod config;
pub mod database;
pub mod export;
pub mod inventory;
pub mod service;
pub mod session;

pub use config::{ConfigError, ProviderConfig};
pub use database::{Database, DATABASE_FILE_NAME};
pub use export::{commit_and_export, export, HOSTS_FILE_NAME};
pub use inventory::{Inventory, InventoryMap};
pub use service::{HostChanges, InventoryService};
pub use session::InventoryLock;
