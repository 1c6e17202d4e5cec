//! # Engine Error Types
//!
//! Errors raised while setting up the engine. Once running, the service
//! does not fail on persistence problems; it logs them.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │  Configuration      │   │  Storage Setup      │                     │
//! │  │  ─────────────      │   │  ─────────────      │                     │
//! │  │  InvalidConfig      │   │  NoDataDir          │                     │
//! │  │  ConfigLoadFailed   │   │  Store              │                     │
//! │  │  ConfigSaveFailed   │   │                     │                     │
//! │  └─────────────────────┘   └─────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use larder_store::StoreError;
use thiserror::Error;

/// Engine setup errors.
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A configuration value is out of range or empty.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    ConfigLoadFailed(String),

    /// The config file could not be written.
    #[error("Failed to save configuration: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// No data directory configured and none could be derived.
    #[error("Could not determine a data directory")]
    NoDataDir,

    /// Opening the storage port failed.
    #[error("Storage setup failed: {0}")]
    Store(#[from] StoreError),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

/// Result type for engine setup.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_is_load_failure() {
        let err: EngineError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, EngineError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_store_error_converts() {
        let err: EngineError = StoreError::Unavailable("quota".into()).into();
        assert_eq!(err.to_string(), "Storage setup failed: Storage unavailable: quota");
    }
}
