//! Writing the rendered inventory next to the database.

use std::path::Path;

use tracing::debug;

use ansiblereg_core::RegistryResult;
use ansiblereg_inventory::{encode, Registry};

use crate::atomic::write_atomic;
use crate::database::Database;

/// File name of the rendered inventory inside an inventory directory.
pub const HOSTS_FILE_NAME: &str = "hosts.ini";

/// Render `registry` and replace the file at `path` with the result.
pub fn export(path: &Path, registry: &Registry) -> RegistryResult<()> {
    let text = encode(registry)?;
    write_atomic(path, text.as_bytes())?;
    debug!(path = %path.display(), groups = registry.len(), "exported inventory");
    Ok(())
}

/// Persist the database, then render it to `hosts_file`.
///
/// Both steps are needed after every mutation to keep the two files in step.
pub fn commit_and_export(db: &Database, hosts_file: &Path) -> RegistryResult<()> {
    db.commit()?;
    export(hosts_file, db.registry())
}
