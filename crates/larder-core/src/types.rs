//! # Domain Types
//!
//! Core domain types used throughout Larder.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │        Item          │ 1    * │     UsageRecord      │              │
//! │  │  ──────────────────  │───────►│  ──────────────────  │              │
//! │  │  id (UUID string)    │        │  timestamp           │              │
//! │  │  name, unit          │        │  type (UsageKind)    │              │
//! │  │  quantity            │        │  delta               │              │
//! │  │  threshold           │        │  previousQuantity    │              │
//! │  │  targetQuantity      │        │  newQuantity         │              │
//! │  │  expirationDate?     │        └──────────────────────┘              │
//! │  │  usageHistory        │                                               │
//! │  │  createdAt/updatedAt │        ┌──────────────────────┐              │
//! │  └──────────────────────┘        │  UsageKind           │              │
//! │                                  │  consume | restock   │              │
//! │  ┌──────────────────────┐        │  | adjust            │              │
//! │  │  Theme               │        └──────────────────────┘              │
//! │  │  light|dark|system   │                                               │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are camelCase and every timestamp is an integer count of
//! milliseconds since the Unix epoch. This is the shape of the persisted
//! inventory blob and of JSON exports, and it must stay stable across
//! versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Usage Kind
// =============================================================================

/// The kind of quantity change a usage record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    /// Relative reduction through `adjust_quantity` with a negative delta.
    Consume,
    /// Absolute set through `restock_item`.
    Restock,
    /// Relative, non-restock change (positive through `adjust_quantity`).
    Adjust,
}

impl UsageKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageKind::Consume => "consume",
            UsageKind::Restock => "restock",
            UsageKind::Adjust => "adjust",
        }
    }
}

impl std::fmt::Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Usage Record
// =============================================================================

/// One quantity-change event in an item's ledger.
///
/// ## Invariant
/// `new_quantity == previous_quantity + delta`, and `new_quantity >= 0` is
/// guaranteed by the unsigned type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// When the change happened.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub timestamp: DateTime<Utc>,

    /// What kind of change this was.
    #[serde(rename = "type")]
    pub kind: UsageKind,

    /// Signed change; negative means a reduction.
    #[ts(type = "number")]
    pub delta: i64,

    /// Quantity before the change.
    pub previous_quantity: u32,

    /// Quantity after the change.
    pub new_quantity: u32,
}

impl UsageRecord {
    /// Returns true if this record counts as consumption for prediction:
    /// every `consume`, plus `adjust` records that reduced stock.
    #[inline]
    pub fn is_consumption(&self) -> bool {
        match self.kind {
            UsageKind::Consume => true,
            UsageKind::Adjust => self.delta < 0,
            UsageKind::Restock => false,
        }
    }

    /// Absolute size of the change.
    #[inline]
    pub fn magnitude(&self) -> u64 {
        self.delta.unsigned_abs()
    }
}

// =============================================================================
// Item
// =============================================================================

/// One tracked household consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Opaque unique identifier (UUID v4 for items created locally,
    /// arbitrary strings for imported ones). Immutable.
    pub id: String,

    /// Display name, never empty.
    pub name: String,

    /// Current stock.
    pub quantity: u32,

    /// Free-text unit label ("pcs", "L", "pack").
    pub unit: String,

    /// Low-stock warning level.
    pub threshold: u32,

    /// Default amount used to pre-fill a restock.
    pub target_quantity: u32,

    /// Optional expiration timestamp.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    #[ts(type = "number | null")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// Ledger of quantity changes, newest first.
    #[serde(default)]
    pub usage_history: Vec<UsageRecord>,

    /// When the item was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub created_at: DateTime<Utc>,

    /// When the item was last mutated.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Builds a fresh item from caller input, with a new random id and an
    /// empty history.
    pub fn create(data: NewItem, now: DateTime<Utc>) -> Self {
        Item {
            id: Uuid::new_v4().to_string(),
            target_quantity: data.target_quantity.unwrap_or(data.quantity),
            name: data.name,
            quantity: data.quantity,
            unit: data.unit,
            threshold: data.threshold,
            expiration_date: data.expiration_date,
            usage_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true when stock is at or below the warning threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    /// Returns the most recent usage record, if any.
    #[inline]
    pub fn latest_record(&self) -> Option<&UsageRecord> {
        self.usage_history.first()
    }

    /// Iterates consumption-like records, newest first.
    pub fn consumption_records(&self) -> impl Iterator<Item = &UsageRecord> {
        self.usage_history.iter().filter(|r| r.is_consumption())
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Data supplied by the caller to create an item.
///
/// `target_quantity` defaults to `quantity` when not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub threshold: u32,
    pub target_quantity: Option<u32>,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl NewItem {
    /// Creates a new item description with the given name and quantity.
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        NewItem {
            name: name.into(),
            quantity,
            ..Default::default()
        }
    }

    /// Sets the unit label.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the low-stock threshold.
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Overrides the restock target (otherwise the initial quantity).
    pub fn target_quantity(mut self, target: u32) -> Self {
        self.target_quantity = Some(target);
        self
    }

    /// Sets the expiration date.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_date = Some(at);
        self
    }
}

/// Partial update of an item's descriptive fields.
///
/// Quantity is deliberately absent: stock only moves through
/// `adjust_quantity` and `restock_item`, which keep the ledger consistent.
/// `expiration_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub threshold: Option<u32>,
    pub target_quantity: Option<u32>,
    pub expiration_date: Option<Option<DateTime<Utc>>>,
}

impl ItemPatch {
    /// Returns true if the patch carries no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.unit.is_none()
            && self.threshold.is_none()
            && self.target_quantity.is_none()
            && self.expiration_date.is_none()
    }

    /// Merges the patch into `item`. Does not touch `updated_at`.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(unit) = &self.unit {
            item.unit = unit.clone();
        }
        if let Some(threshold) = self.threshold {
            item.threshold = threshold;
        }
        if let Some(target) = self.target_quantity {
            item.target_quantity = target;
        }
        if let Some(expiration) = self.expiration_date {
            item.expiration_date = expiration;
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Appearance preference, persisted as a bare string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl Theme {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Resolves `System` against the OS preference supplied by the UI layer.
    pub fn resolve(self, os_prefers_dark: bool) -> Theme {
        match self {
            Theme::System if os_prefers_dark => Theme::Dark,
            Theme::System => Theme::Light,
            other => other,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!(
                "Unknown theme: '{}'. Valid options: light, dark, system",
                other
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn sample_item() -> Item {
        Item {
            id: "item-1".to_string(),
            name: "Milk".to_string(),
            quantity: 3,
            unit: "L".to_string(),
            threshold: 1,
            target_quantity: 4,
            expiration_date: None,
            usage_history: vec![UsageRecord {
                timestamp: ts(2_000),
                kind: UsageKind::Consume,
                delta: -1,
                previous_quantity: 4,
                new_quantity: 3,
            }],
            created_at: ts(1_000),
            updated_at: ts(2_000),
        }
    }

    #[test]
    fn test_item_wire_format() {
        let json = serde_json::to_value(sample_item()).unwrap();
        assert_eq!(json["targetQuantity"], 4);
        assert_eq!(json["createdAt"], 1_000);
        assert_eq!(json["usageHistory"][0]["type"], "consume");
        assert_eq!(json["usageHistory"][0]["previousQuantity"], 4);
        // Absent expiration date is omitted entirely
        assert!(json.get("expirationDate").is_none());
    }

    #[test]
    fn test_item_deserializes_without_optional_fields() {
        let json = r#"{"id":"a","name":"Rice","quantity":2,"unit":"kg",
            "threshold":1,"targetQuantity":2,"createdAt":5,"updatedAt":6}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.usage_history.is_empty());
        assert!(item.expiration_date.is_none());
        assert_eq!(item.updated_at, ts(6));
    }

    #[test]
    fn test_create_defaults_target_to_quantity() {
        let now = ts(10_000);
        let item = Item::create(NewItem::new("Eggs", 12).unit("pcs").threshold(4), now);
        assert_eq!(item.target_quantity, 12);
        assert_eq!(item.created_at, now);
        assert_eq!(item.updated_at, now);
        assert!(item.usage_history.is_empty());

        let other = Item::create(NewItem::new("Eggs", 2).target_quantity(6), now);
        assert_eq!(other.target_quantity, 6);
        assert_ne!(item.id, other.id);
    }

    #[test]
    fn test_consumption_classification() {
        let mut record = sample_item().usage_history[0].clone();
        assert!(record.is_consumption());

        record.kind = UsageKind::Adjust;
        assert!(record.is_consumption());

        record.delta = 2;
        assert!(!record.is_consumption());

        record.kind = UsageKind::Restock;
        record.delta = -2;
        assert!(!record.is_consumption());
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut item = sample_item();
        item.quantity = 1;
        assert!(item.is_low_stock());
        item.quantity = 2;
        assert!(!item.is_low_stock());
    }

    #[test]
    fn test_patch_preserves_unset_fields() {
        let mut item = sample_item();
        let patch = ItemPatch {
            name: Some("Oat milk".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.name, "Oat milk");
        assert_eq!(item.target_quantity, 4);
        assert_eq!(item.unit, "L");
    }

    #[test]
    fn test_patch_clears_expiration() {
        let mut item = sample_item();
        item.expiration_date = Some(ts(9_000));
        ItemPatch {
            expiration_date: Some(None),
            ..Default::default()
        }
        .apply_to(&mut item);
        assert!(item.expiration_date.is_none());
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("system".parse::<Theme>().unwrap(), Theme::System);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::System.resolve(true), Theme::Dark);
        assert_eq!(Theme::Light.resolve(true), Theme::Light);
    }
}
