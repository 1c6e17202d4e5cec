//! # Error Types
//!
//! Domain-specific error types for larder-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  larder-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  ├── ImportError      - Whole-import rejection                         │
//! │  └── ExportError      - Serialization failures on export               │
//! │                                                                         │
//! │  larder-store errors (separate crate)                                  │
//! │  └── StoreError       - Key-value port failures (logged, not raised)   │
//! │                                                                         │
//! │  larder-engine errors                                                  │
//! │  └── EngineError      - Configuration failures                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutation operations never fail: missing ids and unchanged quantities
//! degrade to no-ops. Errors only surface where the caller has to tell the
//! user something (a rejected import, an invalid form).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No item with the given id exists in the collection.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by callers to pre-validate form input before invoking a store
/// operation. The store itself assumes validated input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Import / Export Errors
// =============================================================================

/// Reasons an import is rejected as a whole.
///
/// ## Rejection Flow
/// ```text
/// content ──► JSON array? ──no──► CSV rows? ──no──► Unparseable
///                  │                   │
///                 yes                 yes
///                  ▼                   ▼
///          records with id+name == 0 ──────────► NoValidRecords
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    /// Content was empty or whitespace only.
    #[error("Import content is empty")]
    Empty,

    /// Content is neither a JSON array nor readable CSV.
    #[error("Import content is neither a JSON array nor CSV: {0}")]
    Unparseable(String),

    /// Content parsed, but no record carried both an id and a name.
    #[error("Import contained no valid records")]
    NoValidRecords,
}

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// JSON serialization failed (the JSON export, or a CSV history cell).
    #[error("Export failed: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for imports.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for exports.
pub type ExportResult<T> = Result<T, ExportError>;

// =============================================================================
// Unit Tests
// =============================================================================
