//! File-backed key-value store.
//!
//! All entries live in one JSON object file (`session.json`) inside a
//! configured directory. Every write rewrites the whole file atomically.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};

use super::atomic_io::write_atomic;
use crate::domain::ports::{KeyValueStore, StoreError};

const SESSION_FILE: &str = "session.json";

/// Key-value store persisted as `session.json` in a directory.
///
/// # Examples
///
/// ```rust,no_run
/// use myflix_client::domain::ports::KeyValueStore;
/// use myflix_client::outbound::storage::FileKeyValueStore;
///
/// let store = FileKeyValueStore::open(".myflix")?;
/// store.set("token", "abc")?;
/// # Ok::<(), myflix_client::domain::ports::StoreError>(())
/// ```
pub struct FileKeyValueStore {
    dir: Dir,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the store directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, StoreError> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory).map_err(|err| {
            StoreError::io(format!(
                "failed to create session directory '{}': {err}",
                directory.display()
            ))
        })?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority()).map_err(|err| {
            StoreError::io(format!(
                "failed to open session directory '{}': {err}",
                directory.display()
            ))
        })?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match self.dir.read_to_string(SESSION_FILE) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(StoreError::io(format!(
                    "failed to read {SESSION_FILE}: {err}"
                )));
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|err| StoreError::corrupt(format!("{SESSION_FILE} is not a string map: {err}")))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(entries)
            .map_err(|err| StoreError::corrupt(format!("failed to encode entries: {err}")))?;
        write_atomic(&self.dir, Utf8Path::new(SESSION_FILE), &encoded)
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::io("session file lock poisoned"))?;
        let mut entries = self.read_entries()?;
        if f(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::io("session file lock poisoned"))?;
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|entries| entries.remove(key).is_some())
    }
}
