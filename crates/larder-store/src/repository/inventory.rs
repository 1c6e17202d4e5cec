//! # Inventory Repository
//!
//! Loads and saves the whole item collection as one JSON blob.
//!
//! There is no per-item storage: every save rewrites the full array. The
//! collection is small (a household's consumables) and the port has no
//! notion of partial writes.

use std::sync::Arc;

use larder_core::Item;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::port::KeyValueStore;

/// Repository for the persisted item collection.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use larder_store::{InventoryRepository, MemoryStore};
///
/// let repo = InventoryRepository::new(Arc::new(MemoryStore::new()), "inventory");
/// assert!(repo.load_or_empty().is_empty());
/// ```
#[derive(Clone)]
pub struct InventoryRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl InventoryRepository {
    /// Creates a repository over `store`, keeping the blob under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        InventoryRepository {
            store,
            key: key.into(),
        }
    }

    /// The key the blob is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the collection. A missing blob is an empty collection.
    pub fn load(&self) -> StoreResult<Vec<Item>> {
        match self.store.get(&self.key)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Reads the collection, treating any failure as empty.
    pub fn load_or_empty(&self) -> Vec<Item> {
        match self.load() {
            Ok(items) => {
                debug!(key = %self.key, count = items.len(), "Loaded inventory");
                items
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Inventory unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Writes the full collection.
    pub fn save(&self, items: &[Item]) -> StoreResult<()> {
        let blob = serde_json::to_string(items)?;
        self.store.set(&self.key, &blob)
    }
}

impl std::fmt::Debug for InventoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
