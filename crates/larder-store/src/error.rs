//! # Store Error Types
//!
//! Error types for key-value persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Port failure (io::Error, lock, quota)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryService logs it with warn!/error! and carries on:            │
//! │  the in-memory collection stays authoritative                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Key-value persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    ///
    /// ## When This Occurs
    /// - Data directory missing or not writable
    /// - Disk full
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored blob could not be encoded or decoded.
    #[error("Stored value is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The port refused the operation.
    ///
    /// ## When This Occurs
    /// - Storage disabled or over quota
    /// - In tests, a `MemoryStore` switched to unavailable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be used with this port.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
