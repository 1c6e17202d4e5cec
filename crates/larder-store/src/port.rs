//! # Key-Value Port
//!
//! The only persistence contract the engine relies on: read a string by key,
//! write a string by key. Either may fail; callers decide what a failure
//! means.

use crate::error::StoreResult;

/// A string-keyed, string-valued store.
///
/// Implementations must be safe to share across threads; the engine holds
/// one behind an `Arc` shared by both repositories.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing is.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
