//! # Engine Configuration
//!
//! Configuration for storage location, undo window and logging.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LARDER_DATA_DIR=/srv/larder                                        │
//! │     LARDER_UNDO_WINDOW_SECS=6                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/larder/larder.toml (Linux)                               │
//! │     ~/Library/Application Support/app.larder.larder/larder.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, larder_inventory_v1, 4 second undo              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # larder.toml
//! [storage]
//! data_dir = "/home/me/.local/share/larder"
//! inventory_key = "larder_inventory_v1"
//! theme_key = "larder_theme_v1"
//!
//! [undo]
//! window_secs = 4
//!
//! [logging]
//! filter = "info,larder=debug"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use larder_store::{DEFAULT_INVENTORY_KEY, DEFAULT_THEME_KEY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::DEFAULT_LOG_FILTER;

// =============================================================================
// Sections
// =============================================================================

/// Where and under which keys state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for the file port. `None` means the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Key of the inventory blob.
    #[serde(default = "default_inventory_key")]
    pub inventory_key: String,

    /// Key of the theme preference.
    #[serde(default = "default_theme_key")]
    pub theme_key: String,
}

fn default_inventory_key() -> String {
    DEFAULT_INVENTORY_KEY.to_string()
}

fn default_theme_key() -> String {
    DEFAULT_THEME_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            inventory_key: default_inventory_key(),
            theme_key: default_theme_key(),
        }
    }
}

/// Undo behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoSettings {
    /// How long a pending action stays undoable.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_window_secs() -> u64 {
    4
}

impl Default for UndoSettings {
    fn default() -> Self {
        UndoSettings {
            window_secs: default_window_secs(),
        }
    }
}

impl UndoSettings {
    /// The undo window as a `Duration`.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Undo settings.
    #[serde(default)]
    pub undo: UndoSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl EngineConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (larder.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.storage.inventory_key.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "storage.inventory_key must not be empty".into(),
            ));
        }

        if self.storage.theme_key.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "storage.theme_key must not be empty".into(),
            ));
        }

        if self.storage.inventory_key == self.storage.theme_key {
            return Err(EngineError::InvalidConfig(
                "storage.inventory_key and storage.theme_key must differ".into(),
            ));
        }

        if self.undo.window_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "undo.window_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Resolves the data directory: configured, else the platform default.
    pub fn data_dir(&self) -> EngineResult<PathBuf> {
        self.storage
            .data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .ok_or(EngineError::NoDataDir)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("LARDER_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup("LARDER_INVENTORY_KEY") {
            self.storage.inventory_key = key;
        }

        if let Some(key) = lookup("LARDER_THEME_KEY") {
            self.storage.theme_key = key;
        }

        if let Some(secs) = lookup("LARDER_UNDO_WINDOW_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => {
                    debug!(window_secs = s, "Overriding undo window from environment");
                    self.undo.window_secs = s;
                }
                Err(_) => warn!(value = %secs, "Ignoring non-numeric LARDER_UNDO_WINDOW_SECS"),
            }
        }

        if let Some(filter) = lookup("LARDER_LOG") {
            self.logging.filter = filter;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("app", "larder", "larder")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("larder.toml"))
    }
}
