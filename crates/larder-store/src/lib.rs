//! # larder-store: Persistence Layer for Larder
//!
//! Keeps the inventory and theme preference in an opaque key-value port.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Larder Data Flow                                 │
//! │                                                                         │
//! │  InventoryService mutation                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   larder-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────┐        ┌─────────────────────────────┐ │   │
//! │  │   │   Repositories    │        │   KeyValueStore ports       │ │   │
//! │  │   │                   │        │                             │ │   │
//! │  │   │ InventoryRepo     │───────►│ MemoryStore (in-process)    │ │   │
//! │  │   │ ThemeRepo         │        │ FileStore   (one file/key)  │ │   │
//! │  │   └───────────────────┘        └─────────────────────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`port`] - The `KeyValueStore` trait
//! - [`memory`] - In-memory port
//! - [`file`] - Directory-backed port
//! - [`repository`] - Inventory and theme repositories
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use larder_store::{InventoryRepository, MemoryStore, DEFAULT_INVENTORY_KEY};
//!
//! let store = Arc::new(MemoryStore::new());
//! let inventory = InventoryRepository::new(store, DEFAULT_INVENTORY_KEY);
//! inventory.save(&[]).unwrap();
//! assert!(inventory.load().unwrap().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod memory;
pub mod port;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use port::KeyValueStore;

// Repository re-exports for convenience
pub use repository::{InventoryRepository, ThemeRepository, DEFAULT_INVENTORY_KEY, DEFAULT_THEME_KEY};
