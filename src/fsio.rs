//! File helpers shared by the key manager and the command-line front end.
//!
//! Reads hold the handle only for the duration of the call. Writes go to a
//! temporary file in the destination directory and are renamed into place
//! once fully flushed, so a failed run never leaves a truncated output.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, Web3DataError};

/// Permission bits for files holding keys or decrypted data.
pub const OWNER_RW: u32 = 0o600;

/// Permission bits for directories holding key files.
pub const OWNER_RWX: u32 = 0o700;

/// Read a whole file into memory.
pub fn read(path: &Path, context: &'static str) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| Web3DataError::io(context, path, e))?;
    debug!(path = %path.display(), len = bytes.len(), "read file");
    Ok(bytes)
}

/// Atomically replace `path` with `contents`, restricting it to `mode` on Unix.
pub fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Web3DataError::io("failed to create temporary file in", dir, e))?;
    set_mode(tmp.as_file(), mode).map_err(|e| Web3DataError::io("failed to set permissions on", tmp.path(), e))?;

    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Web3DataError::io("failed to write", path, e))?;

    // On failure the temporary file is removed when `PersistError` drops.
    tmp.persist(path)
        .map_err(|e| Web3DataError::io("failed to write", path, e.error))?;

    debug!(path = %path.display(), len = contents.len(), "wrote file");
    Ok(())
}

/// Create `dir` and any missing parents, restricting newly created ones to `mode` on Unix.
pub fn create_dir_all(dir: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(dir)
        .map_err(|e| Web3DataError::io("failed to create directory", dir, e))
}

#[cfg(unix)]
fn set_mode(file: &fs::File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
