use super::error::StorageError;
use super::files::{atomic_write, read_file};
use std::path::PathBuf;
#[cfg(test)]
use std::{cell::RefCell, rc::Rc};

/// Durable home of the serialized `taskHistory` value
pub trait ArchiveStore {
    /// Raw persisted value, `None` if nothing was ever written
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the persisted value
    fn save(&self, value: &str) -> Result<(), StorageError>;
}

/// Stores the archive as one JSON file, written atomically
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArchiveStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        read_file(&self.path)
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        atomic_write(&self.path, value)
    }
}

/// In-memory store; clones share the same slot
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an existing value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(value.into()))),
        }
    }

    /// Current stored value
    pub fn value(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

#[cfg(test)]
impl ArchiveStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value())
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}
