//! # larder-core: Pure Inventory Logic for Larder
//!
//! This crate holds everything Larder knows about items and their stock
//! history, as pure functions over plain data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Larder Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (external)                                │   │
//! │  │    Item list ──► Adjust buttons ──► Undo toast ──► Import/Export│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            larder-engine (InventoryService)                     │   │
//! │  │    item store, undo controller, theme, config                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ larder-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────────┐ │   │
//! │  │   │  types   │ │  ledger  │ │ predictor │ │ codec + coerce   │ │   │
//! │  │   │  Item    │ │  adjust  │ │   days    │ │ CSV / JSON       │ │   │
//! │  │   │  Record  │ │  restock │ │ remaining │ │ import / merge   │ │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            larder-store (key-value persistence)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Item, UsageRecord, inputs and Theme
//! - [`clock`] - Injectable source of "now"
//! - [`ledger`] - Quantity changes and their usage records
//! - [`predictor`] - Days-remaining estimate from usage history
//! - [`coerce`] - Total field coercion for imported records
//! - [`codec`] - CSV / JSON export, import parsing, merge by id
//! - [`validation`] - Form input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use larder_core::{ledger, predictor, Item, NewItem};
//!
//! let created = Utc.timestamp_millis_opt(0).unwrap();
//! let mut item = Item::create(NewItem::new("Coffee", 10), created);
//!
//! // Two packs used over four days
//! ledger::adjust(&mut item, -2, created + Duration::days(4));
//!
//! // 8 left at 0.5/day
//! assert_eq!(predictor::estimate_days_remaining(&item), Some(16));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod codec;
pub mod coerce;
pub mod error;
pub mod ledger;
pub mod predictor;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ExportError, ImportError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a unit label, in characters.
pub const MAX_UNIT_LEN: usize = 20;
