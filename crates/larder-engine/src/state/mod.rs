//! # State Module
//!
//! Shared mutable state behind the inventory service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │  ItemStore   │  │  UndoController  │  │   ThemeState     │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<      │  │  Mutex<Theme>    │          │
//! │  │   Vec<Item>  │  │    UndoSlot>>    │  │                  │          │
//! │  │  >>          │  │  + expiry task   │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  LOCK ORDER: items before undo. Undo is only touched after the items   │
//! │  lock has been released.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod items;
mod theme;
mod undo;

pub use items::ItemStore;
pub use theme::ThemeState;
pub use undo::{PendingAction, UndoController, UndoTarget};
