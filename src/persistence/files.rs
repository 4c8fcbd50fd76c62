use super::error::StorageError;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and in the home directory
pub const DATA_DIR_NAME: &str = ".chronolog";

/// File holding the `taskHistory` mapping
pub const ARCHIVE_FILE_NAME: &str = "taskHistory.json";

/// Get the data directory - an explicit override wins, then a local
/// .chronolog found walking up from the current directory, then ~/.chronolog
pub fn get_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find a local .chronolog directory by walking up the directory tree
fn find_local_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = get_data_dir(override_dir)?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .chronolog directory inside `parent`
pub fn init_local_dir(parent: &Path) -> Result<PathBuf> {
    let dir = parent.join(DATA_DIR_NAME);

    if dir.exists() {
        anyhow::bail!("Data directory already exists: {}", dir.display());
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    Ok(dir)
}

/// Path to the archive file
pub fn archive_file(dir: &Path) -> PathBuf {
    dir.join(ARCHIVE_FILE_NAME)
}

/// Path to config.json
pub fn config_file(dir: &Path) -> PathBuf {
    dir.join("config.json")
}

/// Path to the log file
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join("chronolog.log")
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<(), StorageError> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .ok_or_else(|| StorageError::NoParent(path.to_path_buf()))?;

    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| StorageError::io(temp_file.path(), e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| StorageError::io(path, e))?;

    temp_file
        .persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;

    Ok(())
}

/// Read file content, `None` if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<String>, StorageError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::io(path, e)),
    }
}
