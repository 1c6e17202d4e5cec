//! # Undo Controller
//!
//! Holds at most one recoverable action, for a short window.
//!
//! ## Slot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Undo Slot                                       │
//! │                                                                         │
//! │            register(action)                                            │
//! │   ┌──────┐ ───────────────► ┌─────────────────────────────┐            │
//! │   │ Empty│                  │ Pending(action, deadline)   │◄──┐        │
//! │   └──────┘ ◄─────────────── └─────────────────────────────┘   │        │
//! │      ▲      clear() / expiry        │                          │        │
//! │      │                              └── register(newer) ───────┘        │
//! │      │                                  overwrites, resets the timer    │
//! │      │                                                                  │
//! │   Expiry is enforced twice:                                            │
//! │   • lazily: pending() treats a passed deadline as empty                │
//! │   • eagerly: a tokio task sleeps until the deadline and clears the     │
//! │     slot, so subscribers see the toast disappear                       │
//! │                                                                         │
//! │   Each slot change bumps a generation counter; a timer whose           │
//! │   generation is stale does nothing.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The eager timer needs a tokio runtime. Without one, only the lazy check
//! applies, which is enough for correctness.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use larder_core::UsageRecord;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

// =============================================================================
// Pending Action
// =============================================================================

/// What an undo would act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoTarget {
    /// Revert `record` on `item_id`, provided it is still the item's newest
    /// record.
    Record { item_id: String, record: UsageRecord },
    /// A bulk import. Shown as a confirmation only; undoing discards it
    /// without touching data.
    Import,
}

/// The single recoverable action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    /// Human-readable summary for a transient toast.
    pub description: String,
    /// What undo acts on.
    pub target: UndoTarget,
}

impl PendingAction {
    /// An action that reverts a usage record.
    pub fn record(
        description: impl Into<String>,
        item_id: impl Into<String>,
        record: UsageRecord,
    ) -> Self {
        PendingAction {
            description: description.into(),
            target: UndoTarget::Record {
                item_id: item_id.into(),
                record,
            },
        }
    }

    /// A confirmation-only action for a bulk import.
    pub fn import(description: impl Into<String>) -> Self {
        PendingAction {
            description: description.into(),
            target: UndoTarget::Import,
        }
    }
}

// =============================================================================
// Slot
// =============================================================================

#[derive(Debug, Default)]
struct UndoSlot {
    action: Option<PendingAction>,
    deadline: Option<Instant>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl UndoSlot {
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Empties the slot. Returns true if an action was dropped.
    fn clear(&mut self) -> bool {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.deadline = None;
        self.generation = self.generation.wrapping_add(1);
        self.action.take().is_some()
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Single-slot undo with automatic expiry.
///
/// ## Usage
/// ```rust
/// use std::time::Duration;
/// use larder_engine::state::{PendingAction, UndoController};
///
/// let undo = UndoController::new(Duration::from_secs(4));
/// undo.register(PendingAction::import("Imported 3 items"));
/// assert_eq!(undo.description().as_deref(), Some("Imported 3 items"));
///
/// undo.clear();
/// assert!(undo.pending().is_none());
/// ```
#[derive(Debug)]
pub struct UndoController {
    slot: Arc<Mutex<UndoSlot>>,
    window: Duration,
    notify: Arc<watch::Sender<Option<String>>>,
}

impl UndoController {
    /// Creates an empty controller whose actions live for `window`.
    pub fn new(window: Duration) -> Self {
        let (notify, _) = watch::channel(None);
        UndoController {
            slot: Arc::new(Mutex::new(UndoSlot::default())),
            window,
            notify: Arc::new(notify),
        }
    }

    /// How long a registered action stays pending.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Makes `action` the pending one, replacing any previous action and
    /// restarting the expiry timer.
    pub fn register(&self, action: PendingAction) {
        let deadline = Instant::now() + self.window;
        let mut slot = self.slot.lock().expect("Undo mutex poisoned");

        slot.clear();
        let generation = slot.generation;
        let description = action.description.clone();
        slot.action = Some(action);
        slot.deadline = Some(deadline);
        slot.timer = self.spawn_expiry(generation, deadline);

        debug!(description = %description, window_ms = self.window.as_millis() as u64, "Undo registered");
        self.notify.send_replace(Some(description));
    }

    /// Returns the pending action, if any and not yet expired.
    pub fn pending(&self) -> Option<PendingAction> {
        let mut slot = self.slot.lock().expect("Undo mutex poisoned");
        if slot.is_expired(Instant::now()) {
            slot.clear();
            self.notify.send_replace(None);
            return None;
        }
        slot.action.clone()
    }

    /// Description of the pending action, for display.
    pub fn description(&self) -> Option<String> {
        self.pending().map(|action| action.description)
    }

    /// Drops the pending action. Returns true if there was one.
    pub fn clear(&self) -> bool {
        let mut slot = self.slot.lock().expect("Undo mutex poisoned");
        let dropped = slot.clear();
        if dropped {
            self.notify.send_replace(None);
        }
        dropped
    }

    /// Subscribes to the pending action's description.
    ///
    /// The value is `Some` while an action is pending and `None` once it is
    /// undone, cleared or expired.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.notify.subscribe()
    }

    fn spawn_expiry(&self, generation: u64, deadline: Instant) -> Option<JoinHandle<()>> {
        let runtime = Handle::try_current().ok()?;
        let slot = Arc::clone(&self.slot);
        let notify = Arc::clone(&self.notify);

        Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let mut slot = slot.lock().expect("Undo mutex poisoned");
            if slot.generation != generation {
                return;
            }
            // Our own handle; dropping it detaches, it must not abort us.
            slot.timer = None;
            slot.deadline = None;
            slot.generation = slot.generation.wrapping_add(1);
            if slot.action.take().is_some() {
                debug!("Undo window expired");
                notify.send_replace(None);
            }
        }))
    }
}

impl Drop for UndoController {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
