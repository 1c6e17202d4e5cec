//! # File Port
//!
//! A `KeyValueStore` that keeps one file per key in a data directory.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <data_dir>/                                                            │
//! │  ├── larder_inventory_v1      ← JSON array of items                    │
//! │  ├── larder_theme_v1          ← "light" | "dark" | "system"            │
//! │  └── larder_inventory_v1.tmp  ← transient, renamed over the target     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes go to `<key>.tmp` first and are renamed into place, so a crash
//! mid-write leaves the previous value readable.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::port::KeyValueStore;

/// Directory-backed key-value store.
///
/// ## Example
/// ```rust,no_run
/// use larder_store::{FileStore, KeyValueStore};
///
/// let store = FileStore::open("/var/lib/larder").unwrap();
/// store.set("larder_theme_v1", "dark").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(FileStore { dir })
    }

    /// The directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key = %key, bytes = value.len(), "Wrote key file");
        Ok(())
    }
}
