//! Write-temp-then-rename file replacement.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ansiblereg_core::{RegistryError, RegistryResult};

/// Replace `path` with `data` so readers observe either the old or the new
/// contents, never a partial write.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> RegistryResult<()> {
    let temp_path = temp_path(path);
    if let Err(e) = write_and_rename(&temp_path, path, data) {
        let _ = fs::remove_file(&temp_path);
        return Err(RegistryError::io(format!(
            "failed to write '{}': {e}",
            path.display()
        )));
    }
    Ok(())
}

fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(temp_path, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
