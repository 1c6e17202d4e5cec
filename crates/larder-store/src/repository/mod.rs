//! # Repository Module
//!
//! Typed access to the blobs Larder keeps in a key-value port.
//!
//! ## Persisted State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Independent Blobs                                │
//! │                                                                         │
//! │  InventoryService                                                      │
//! │       │                                                                 │
//! │       ├── InventoryRepository ──► key "larder_inventory_v1"            │
//! │       │       JSON array of Item (camelCase, epoch-ms timestamps)      │
//! │       │                                                                 │
//! │       └── ThemeRepository ──────► key "larder_theme_v1"                │
//! │               bare string: light | dark | system                       │
//! │                                                                         │
//! │  Either blob can be missing or unreadable without affecting the other. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - Item collection load/save
//! - [`ThemeRepository`] - Theme preference load/save

pub mod inventory;
pub mod theme;

pub use inventory::InventoryRepository;
pub use theme::ThemeRepository;

/// Default key of the inventory blob.
pub const DEFAULT_INVENTORY_KEY: &str = "larder_inventory_v1";

/// Default key of the theme preference.
pub const DEFAULT_THEME_KEY: &str = "larder_theme_v1";
