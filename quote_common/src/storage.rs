//! Key-value slots backing the quote store.
//!
//! Storage is deliberately dumb: a slot holds one string under one key and is
//! overwritten wholesale on every write. Two backends are provided:
//!
//! - `FileStore` — durable; one file per key inside a data directory that is
//!   created on first write. Survives restarts.
//! - `MemoryStore` — in-process map. Used for the session-scoped slot (cleared
//!   when the process ends) and in tests.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::result::Result;

/// Slot holding the serialized quote list.
pub const QUOTES_KEY: &str = "dqg.quotes";
/// Slot holding the last selected category filter.
pub const LAST_FILTER_KEY: &str = "dqg.lastFilter";
/// Session slot holding the last quote shown.
pub const LAST_VIEWED_KEY: &str = "dqg.lastViewed";

/// Minimal string key-value storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` when the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Overwrite the slot `key` with `value`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Clear the slot `key`. Clearing an empty slot is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Durable storage: one file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. Nothing touches the disk until the first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(key);
        // Write beside the slot and rename so a crash never leaves half a list behind.
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage that lives exactly as long as the value itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_missing_slot_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get(QUOTES_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.set(LAST_FILTER_KEY, "Wisdom").unwrap();
        assert_eq!(store.get(LAST_FILTER_KEY).unwrap().as_deref(), Some("Wisdom"));

        store.set(LAST_FILTER_KEY, "all").unwrap();
        assert_eq!(store.get(LAST_FILTER_KEY).unwrap().as_deref(), Some("all"));

        store.remove(LAST_FILTER_KEY).unwrap();
        store.remove(LAST_FILTER_KEY).unwrap();
        assert_eq!(store.get(LAST_FILTER_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        FileStore::new(dir.path()).set(QUOTES_KEY, "[]").unwrap();
        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get(QUOTES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn memory_store_is_independent_per_instance() {
        let mut first = MemoryStore::new();
        first.set(LAST_VIEWED_KEY, "x").unwrap();
        let second = MemoryStore::new();
        assert_eq!(second.get(LAST_VIEWED_KEY).unwrap(), None);
        assert_eq!(first.get(LAST_VIEWED_KEY).unwrap().as_deref(), Some("x"));
    }
}
