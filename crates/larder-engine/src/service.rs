//! # Inventory Service
//!
//! The engine's public surface: every mutation, query, import and export
//! goes through here.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mutation Pipeline                                  │
//! │                                                                         │
//! │  caller ──► InventoryService::adjust_quantity(id, Δ)                   │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │           ItemStore lock ──► ledger::adjust ──► record?                │
//! │                  │                                 │                    │
//! │                  │                      None ──────┴──► return (no-op)  │
//! │                  ▼                                                      │
//! │           persist (best effort, failures logged)                       │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │           UndoController::register  (adjust and import only)           │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │           change listeners notified with the new collection            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Undo Eligibility
//! ```text
//! ┌──────────────────┬──────────────┬───────────────────────────────────┐
//! │ Operation        │ Undoable     │ Notes                             │
//! ├──────────────────┼──────────────┼───────────────────────────────────┤
//! │ create           │ no           │                                   │
//! │ update           │ no           │                                   │
//! │ delete           │ no           │ irreversible                      │
//! │ adjust_quantity  │ yes          │ only when the quantity moved      │
//! │ restock_item     │ no           │                                   │
//! │ import_data      │ confirmation │ undo discards, data stays         │
//! └──────────────────┴──────────────┴───────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use larder_core::codec::{self, MergeOutcome};
use larder_core::error::{ExportResult, ImportResult};
use larder_core::{
    ledger, predictor, Clock, CoreError, CoreResult, Item, ItemPatch, NewItem, SystemClock, Theme,
    UsageRecord,
};
use larder_store::{FileStore, InventoryRepository, KeyValueStore, ThemeRepository};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::state::{ItemStore, PendingAction, ThemeState, UndoController, UndoTarget};

/// Callback invoked with the full collection after every change.
///
/// Listeners are called with no engine lock held, so they may query or
/// mutate the service. A listener that mutates on every call recurses.
pub type ChangeListener = Arc<dyn Fn(&[Item]) + Send + Sync>;

/// Counts reported by a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Valid records in the imported content.
    pub imported: usize,
    /// Records whose id was new.
    pub added: usize,
    /// Existing items replaced wholesale.
    pub replaced: usize,
}

/// The inventory engine.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use larder_core::NewItem;
/// use larder_engine::{EngineConfig, InventoryService};
/// use larder_store::MemoryStore;
///
/// let service = InventoryService::new(Arc::new(MemoryStore::new()), &EngineConfig::default());
/// let milk = service.create(NewItem::new("Milk", 2).unit("L").threshold(1));
///
/// service.adjust_quantity(&milk.id, -1);
/// assert_eq!(service.get(&milk.id).unwrap().quantity, 1);
///
/// assert!(service.undo());
/// assert_eq!(service.get(&milk.id).unwrap().quantity, 2);
/// ```
pub struct InventoryService {
    items: ItemStore,
    undo: UndoController,
    theme: ThemeState,
    inventory_repo: InventoryRepository,
    theme_repo: ThemeRepository,
    clock: Arc<dyn Clock>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl InventoryService {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a service over `store`, loading any persisted state.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &EngineConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Creates a service with an explicit clock.
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let inventory_repo =
            InventoryRepository::new(Arc::clone(&store), config.storage.inventory_key.clone());
        let theme_repo = ThemeRepository::new(store, config.storage.theme_key.clone());

        let items = inventory_repo.load_or_empty();
        let theme = theme_repo.load_or_default();
        info!(items = items.len(), theme = %theme, "Inventory service started");

        InventoryService {
            items: ItemStore::new(items),
            undo: UndoController::new(config.undo.window()),
            theme: ThemeState::new(theme),
            inventory_repo,
            theme_repo,
            clock,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Opens a service backed by files in the configured data directory.
    pub fn open(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let store = FileStore::open(config.data_dir()?)?;
        info!(dir = %store.dir().display(), "Using file storage");
        Ok(Self::new(Arc::new(store), config))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates an item at the front of the collection.
    ///
    /// Input is assumed pre-validated, so callers check form data first:
    /// ```rust
    /// use std::sync::Arc;
    /// use larder_core::validation::validate_new_item;
    /// use larder_core::NewItem;
    /// use larder_engine::{EngineConfig, InventoryService};
    /// use larder_store::MemoryStore;
    ///
    /// let service = InventoryService::new(Arc::new(MemoryStore::new()), &EngineConfig::default());
    ///
    /// let blank = NewItem::new("  ", 1);
    /// assert!(validate_new_item(&blank).is_err());
    ///
    /// let rice = NewItem::new("Rice", 2).unit("kg");
    /// if validate_new_item(&rice).is_ok() {
    ///     service.create(rice);
    /// }
    /// assert_eq!(service.len(), 1);
    /// ```
    pub fn create(&self, data: NewItem) -> Item {
        let item = Item::create(data, self.clock.now());
        debug!(item_id = %item.id, name = %item.name, quantity = item.quantity, "Item created");

        self.items.insert_front(item.clone());
        self.committed();
        item
    }

    /// Merges `patch` into the item with `id`. Returns false if it does not
    /// exist.
    pub fn update(&self, id: &str, patch: ItemPatch) -> bool {
        let now = self.clock.now();
        let updated = self
            .items
            .with_item_mut(id, |item| {
                patch.apply_to(item);
                item.updated_at = now;
            })
            .is_some();

        if updated {
            debug!(item_id = %id, "Item updated");
            self.committed();
        } else {
            debug!(item_id = %id, "Update ignored, no such item");
        }
        updated
    }

    /// Removes the item with `id`. Not undoable.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.items.remove(id);
        if removed {
            debug!(item_id = %id, "Item deleted");
            self.committed();
        }
        removed
    }

    /// Changes the quantity by `delta`, flooring at zero and saturating at
    /// `u32::MAX`.
    ///
    /// Returns the new usage record, or `None` when the item is missing or
    /// the quantity did not move. Only a real change is persisted and
    /// registered for undo.
    pub fn adjust_quantity(&self, id: &str, delta: i64) -> Option<UsageRecord> {
        let now = self.clock.now();
        let (name, record) = self
            .items
            .with_item_mut(id, |item| {
                ledger::adjust(item, delta, now).map(|record| (item.name.clone(), record))
            })
            .flatten()?;

        debug!(
            item_id = %id,
            delta = record.delta,
            quantity = record.new_quantity,
            kind = %record.kind,
            "Quantity adjusted"
        );
        self.committed();

        self.undo.register(PendingAction::record(
            format!("{}: {} → {}", name, record.previous_quantity, record.new_quantity),
            id,
            record.clone(),
        ));
        Some(record)
    }

    /// Sets the quantity to `new_quantity`.
    ///
    /// Returns the restock record, or `None` when the item is missing or
    /// already holds that quantity. Not undoable.
    pub fn restock_item(&self, id: &str, new_quantity: u32) -> Option<UsageRecord> {
        let now = self.clock.now();
        let record = self
            .items
            .with_item_mut(id, |item| ledger::restock(item, new_quantity, now))
            .flatten()?;

        debug!(item_id = %id, delta = record.delta, quantity = new_quantity, "Item restocked");
        self.committed();
        Some(record)
    }

    /// Reverts the pending action, if it can still be reverted.
    ///
    /// ## Outcomes
    /// - nothing pending, or expired: no-op
    /// - pending import: the confirmation is dismissed, data untouched
    /// - item gone, or its newest record is not the one the action made:
    ///   no-op, the action stays pending until it expires
    /// - otherwise: quantity restored, record removed, slot cleared
    ///
    /// Returns true if data changed.
    pub fn undo(&self) -> bool {
        let Some(action) = self.undo.pending() else {
            debug!("Nothing to undo");
            return false;
        };

        let (item_id, record) = match action.target {
            UndoTarget::Import => {
                info!(description = %action.description, "Import confirmation dismissed");
                self.undo.clear();
                return false;
            }
            UndoTarget::Record { item_id, record } => (item_id, record),
        };

        let now = self.clock.now();
        let reverted = self
            .items
            .with_item_mut(&item_id, |item| ledger::revert_head(item, &record, now))
            .unwrap_or(false);

        if !reverted {
            debug!(item_id = %item_id, "Undo target is stale, leaving it to expire");
            return false;
        }

        info!(item_id = %item_id, description = %action.description, "Undone");
        self.undo.clear();
        self.committed();
        true
    }

    /// Imports CSV or JSON content, merging by id.
    ///
    /// Each imported record replaces any existing item with its id. The
    /// import registers a confirmation in the undo slot, but cannot itself
    /// be undone.
    pub fn import_data(&self, content: &str) -> ImportResult<ImportSummary> {
        let incoming = codec::parse_import(content, self.clock.now())?;
        let imported = incoming.len();

        let (added, replaced) = self.items.with_items_mut(|items| {
            let MergeOutcome {
                items: merged,
                added,
                replaced,
            } = codec::merge(std::mem::take(items), incoming);
            *items = merged;
            (added, replaced)
        });

        info!(imported, added, replaced, "Import merged");
        self.committed();

        self.undo
            .register(PendingAction::import(format!("Imported {} items", imported)));

        Ok(ImportSummary {
            imported,
            added,
            replaced,
        })
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// The collection as BOM-prefixed CSV.
    pub fn export_csv(&self) -> ExportResult<String> {
        self.items.with_items(codec::export_csv)
    }

    /// The collection as pretty-printed JSON.
    pub fn export_json(&self) -> ExportResult<String> {
        self.items.with_items(codec::export_json)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns a copy of the item with `id`.
    pub fn get(&self, id: &str) -> Option<Item> {
        self.items.get(id)
    }

    /// Returns a copy of the collection, newest first.
    pub fn items(&self) -> Vec<Item> {
        self.items.snapshot()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Estimated days until the item runs out; `Ok(None)` when unknown.
    pub fn days_remaining(&self, id: &str) -> CoreResult<Option<i64>> {
        self.items
            .with_items(|items| {
                items
                    .iter()
                    .find(|i| i.id == id)
                    .map(predictor::estimate_days_remaining)
            })
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    /// Items at or below their threshold.
    pub fn restock_list(&self) -> Vec<Item> {
        self.items.restock_list()
    }

    /// Items in display order: low stock first, then recently updated.
    pub fn sorted_for_display(&self) -> Vec<Item> {
        self.items.sorted_for_display()
    }

    // =========================================================================
    // Undo Surface
    // =========================================================================

    /// Description of the pending undoable action, if any.
    pub fn pending_undo(&self) -> Option<String> {
        self.undo.description()
    }

    /// Subscribes to the pending action's description.
    pub fn subscribe_undo(&self) -> watch::Receiver<Option<String>> {
        self.undo.subscribe()
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// The stored appearance preference.
    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// The concrete appearance, given the OS preference.
    pub fn resolved_theme(&self, os_prefers_dark: bool) -> Theme {
        self.theme.get().resolve(os_prefers_dark)
    }

    /// Changes and persists the appearance preference.
    pub fn set_theme(&self, theme: Theme) {
        if !self.theme.set(theme) {
            return;
        }
        debug!(theme = %theme, "Theme changed");
        if let Err(e) = self.theme_repo.save(theme) {
            warn!(error = %e, "Failed to persist theme");
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a callback run with the collection after every change.
    pub fn on_change(&self, listener: ChangeListener) {
        self.listeners
            .lock()
            .expect("Listeners mutex poisoned")
            .push(listener);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persists the collection and notifies listeners.
    ///
    /// A failed write is logged; the in-memory collection stays
    /// authoritative and the next successful write catches up.
    fn committed(&self) {
        self.items.with_items(|items| {
            if let Err(e) = self.inventory_repo.save(items) {
                error!(key = %self.inventory_repo.key(), error = %e, "Failed to persist inventory");
            }
        });

        // Clone out so listeners can re-enter the service
        let listeners = self
            .listeners
            .lock()
            .expect("Listeners mutex poisoned")
            .clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.items.snapshot();
        for listener in listeners.iter() {
            listener(&snapshot);
        }
    }
}

impl std::fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryService")
            .field("items", &self.items.len())
            .field("theme", &self.theme.get())
            .field("undo", &self.undo)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
