//! # larder-engine: Inventory Service for Larder
//!
//! Runs the inventory: owns the item collection, the undo slot and the
//! theme preference, and persists them through a key-value port.
//!
//! ## Module Organization
//! ```text
//! larder_engine/
//! ├── lib.rs          ◄─── You are here (re-exports, tracing setup)
//! ├── service.rs      ◄─── InventoryService: every public operation
//! ├── config.rs       ◄─── EngineConfig (larder.toml + LARDER_* env)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── items.rs    ◄─── Item collection behind a mutex
//! │   ├── undo.rs     ◄─── Single-slot undo with expiry timer
//! │   └── theme.rs    ◄─── Theme preference
//! └── error.rs        ◄─── Engine setup errors
//! ```
//!
//! ## Startup
//! ```rust,no_run
//! use larder_engine::{init_tracing_with, EngineConfig, InventoryService};
//!
//! let config = EngineConfig::load_or_default(None);
//! init_tracing_with(&config.logging.filter);
//!
//! let service = InventoryService::open(&config).expect("storage");
//! println!("{} items", service.len());
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use service::{ChangeListener, ImportSummary, InventoryService};

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,larder=debug";

/// Initializes the tracing subscriber with the default filter.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=larder_engine=trace` - Trace the engine only
/// - Default: `info,larder=debug`
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Initializes the tracing subscriber, using `default_filter` when
/// `RUST_LOG` is unset. Later calls are ignored.
pub fn init_tracing_with(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests, embedding app)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
