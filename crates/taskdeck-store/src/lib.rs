//! Key-value persistence for taskdeck collections.
//!
//! The repository persists the whole task collection as one JSON blob under a
//! fixed key; this crate supplies the byte-level storage seam plus a durable
//! file-backed implementation and an in-memory one for tests and ephemeral
//! sessions.

mod error;

pub use error::StoreError;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;

/// Minimal byte-level storage abstraction used by the task repository.
pub trait KeyValueStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<anyhow::Error>;

    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error>;
}

/// File-backed store: each key becomes `<root>/<key>.json`.
///
/// Writes go through a named temp file in the same directory followed by a
/// rename, so readers never observe a torn value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    /// Returns an error when the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the store's entries.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.entry_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.entry_path(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value)?;
        tmp.flush()?;
        tmp.persist(path)?;
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl KeyValueStore for MemoryStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}
