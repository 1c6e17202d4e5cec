//! # In-Memory Port
//!
//! A `KeyValueStore` held entirely in process memory. Used by tests and by
//! embedders that persist elsewhere.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::port::KeyValueStore;

/// Process-local key-value store.
///
/// ## Simulating Failure
/// ```rust
/// use larder_store::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set_available(false);
/// assert!(store.set("k", "v").is_err());
/// assert!(store.get("k").is_err());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store pre-populated with the given entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.entries.write().expect("store lock poisoned");
            for (key, value) in entries {
                map.insert(key.into(), value.into());
            }
        }
        store
    }

    /// Makes every subsequent `get`/`set` fail (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the raw value under `key`, bypassing availability.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("store lock poisoned")
            .get(key)
            .cloned()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store disabled".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_available()?;
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_available()?;
        self.entries
            .write()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_unavailable_store_keeps_data() {
        let store = MemoryStore::with_entries([("a", "1")]);
        store.set_available(false);
        assert!(matches!(store.set("a", "2"), Err(StoreError::Unavailable(_))));
        assert_eq!(store.peek("a"), Some("1".to_string()));

        store.set_available(true);
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
    }
}
