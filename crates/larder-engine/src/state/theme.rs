//! # Theme State
//!
//! The current appearance preference, loaded once at startup.

use std::sync::Mutex;

use larder_core::Theme;

/// Lock-protected theme preference.
#[derive(Debug, Default)]
pub struct ThemeState {
    theme: Mutex<Theme>,
}

impl ThemeState {
    /// Creates the state with an initial preference.
    pub fn new(theme: Theme) -> Self {
        ThemeState {
            theme: Mutex::new(theme),
        }
    }

    /// Returns the current preference.
    pub fn get(&self) -> Theme {
        *self.theme.lock().expect("Theme mutex poisoned")
    }

    /// Replaces the preference. Returns true if it changed.
    pub fn set(&self, theme: Theme) -> bool {
        let mut current = self.theme.lock().expect("Theme mutex poisoned");
        let changed = *current != theme;
        *current = theme;
        changed
    }
}
