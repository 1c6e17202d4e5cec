//! # Theme Repository
//!
//! Persists the appearance preference as a bare string.

use std::sync::Arc;

use larder_core::Theme;
use tracing::warn;

use crate::error::StoreResult;
use crate::port::KeyValueStore;

/// Repository for the theme preference.
#[derive(Clone)]
pub struct ThemeRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ThemeRepository {
    /// Creates a repository over `store`, keeping the preference under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        ThemeRepository {
            store,
            key: key.into(),
        }
    }

    /// Reads the preference. Missing, unreadable or unknown values are
    /// `Theme::System`.
    pub fn load_or_default(&self) -> Theme {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key = %self.key, value = %raw, "Unknown theme value, using system");
                Theme::System
            }),
            Ok(None) => Theme::System,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Theme unreadable, using system");
                Theme::System
            }
        }
    }

    /// Writes the preference.
    pub fn save(&self, theme: Theme) -> StoreResult<()> {
        self.store.set(&self.key, theme.as_str())
    }
}

impl std::fmt::Debug for ThemeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    const KEY: &str = "larder_theme_v1";

    #[test]
    fn test_bare_string_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let repo = ThemeRepository::new(store.clone(), KEY);

        repo.save(Theme::Dark).unwrap();
        assert_eq!(store.peek(KEY), Some("dark".to_string()));
        assert_eq!(repo.load_or_default(), Theme::Dark);
    }

    #[test]
    fn test_fallbacks_to_system() {
        let repo = ThemeRepository::new(Arc::new(MemoryStore::new()), KEY);
        assert_eq!(repo.load_or_default(), Theme::System);

        let odd = ThemeRepository::new(Arc::new(MemoryStore::with_entries([(KEY, "sepia")])), KEY);
        assert_eq!(odd.load_or_default(), Theme::System);

        let store = Arc::new(MemoryStore::with_entries([(KEY, "light")]));
        store.set_available(false);
        assert_eq!(ThemeRepository::new(store, KEY).load_or_default(), Theme::System);
    }
}
