//! # Usage Ledger
//!
//! Ledger arithmetic applied to a single item. Every function here either
//! changes the item *and* its history together, or changes nothing.
//!
//! ## Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  adjust(q, Δ)     q' = max(0, q + Δ)    kind = consume if Δ < 0        │
//! │                                                 adjust  otherwise       │
//! │  restock(q, n)    q' = n                kind = restock                  │
//! │                                                                         │
//! │  q' == q  ──►  no record, item untouched                               │
//! │  q' != q  ──►  record prepended to usage_history, updated_at = now     │
//! │                                                                         │
//! │  revert_head(r)   head == r    ──► q = head.previous, pop head         │
//! │                   otherwise    ──► untouched (stale action)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::types::{Item, UsageKind, UsageRecord};

/// Applies a relative change, flooring at zero.
///
/// The recorded `delta` is the effective change, so a clamped `-5` on a
/// quantity of 3 is recorded as `-3` and `previous + delta == new` holds.
///
/// The result saturates at `u32::MAX` on the way up.
///
/// Returns the new record, or `None` when the quantity did not move.
pub fn adjust(item: &mut Item, delta: i64, now: DateTime<Utc>) -> Option<UsageRecord> {
    let target = (i64::from(item.quantity).saturating_add(delta)).clamp(0, i64::from(u32::MAX));
    let kind = if delta < 0 {
        UsageKind::Consume
    } else {
        UsageKind::Adjust
    };
    apply(item, target as u32, kind, now)
}

/// Sets the quantity to an absolute value.
///
/// Returns the new record, or `None` when `new_quantity` equals the
/// current quantity.
pub fn restock(item: &mut Item, new_quantity: u32, now: DateTime<Utc>) -> Option<UsageRecord> {
    apply(item, new_quantity, UsageKind::Restock, now)
}

/// Reverts the most recent record if it is exactly `expected`.
///
/// Records share millisecond timestamps, so the whole record is compared.
/// Returns true if the item was changed.
pub fn revert_head(item: &mut Item, expected: &UsageRecord, now: DateTime<Utc>) -> bool {
    match item.usage_history.first() {
        Some(head) if head == expected => {
            item.quantity = head.previous_quantity;
            item.usage_history.remove(0);
            item.updated_at = now;
            true
        }
        _ => false,
    }
}

fn apply(item: &mut Item, new_quantity: u32, kind: UsageKind, now: DateTime<Utc>) -> Option<UsageRecord> {
    if new_quantity == item.quantity {
        return None;
    }

    let record = UsageRecord {
        timestamp: now,
        kind,
        delta: i64::from(new_quantity) - i64::from(item.quantity),
        previous_quantity: item.quantity,
        new_quantity,
    };

    item.quantity = new_quantity;
    item.usage_history.insert(0, record.clone());
    item.updated_at = now;

    Some(record)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn item_with(quantity: u32) -> Item {
        Item {
            id: "item-1".to_string(),
            name: "Coffee".to_string(),
            quantity,
            unit: "pack".to_string(),
            threshold: 2,
            target_quantity: quantity,
            expiration_date: None,
            usage_history: Vec::new(),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[test]
    fn test_adjust_scenario() {
        let mut item = item_with(10);
        let later = t0() + Duration::minutes(1);

        let first = adjust(&mut item, -3, later).unwrap();
        assert_eq!(item.quantity, 7);
        assert_eq!(first.kind, UsageKind::Consume);
        assert_eq!(first.delta, -3);
        assert_eq!(first.previous_quantity, 10);
        assert_eq!(first.new_quantity, 7);

        adjust(&mut item, -3, later + Duration::minutes(1)).unwrap();
        assert_eq!(item.quantity, 4);
        assert_eq!(item.usage_history.len(), 2);
        // Newest first
        assert_eq!(item.usage_history[0].previous_quantity, 7);
        assert_eq!(item.updated_at, later + Duration::minutes(1));
    }

    #[test]
    fn test_adjust_positive_is_adjust_kind() {
        let mut item = item_with(1);
        let record = adjust(&mut item, 2, t0()).unwrap();
        assert_eq!(record.kind, UsageKind::Adjust);
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_adjust_clamps_and_records_effective_delta() {
        let mut item = item_with(3);
        let record = adjust(&mut item, -5, t0()).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(record.delta, -3);
    }

    #[test]
    fn test_adjust_at_floor_is_noop() {
        let mut item = item_with(0);
        let before = item.clone();
        assert!(adjust(&mut item, -1, t0() + Duration::hours(1)).is_none());
        assert_eq!(item, before);
    }

    #[test]
    fn test_adjust_zero_is_noop() {
        let mut item = item_with(5);
        assert!(adjust(&mut item, 0, t0()).is_none());
        assert!(item.usage_history.is_empty());
    }

    #[test]
    fn test_restock_sets_absolute_quantity() {
        let mut item = item_with(1);
        let record = restock(&mut item, 6, t0()).unwrap();
        assert_eq!(record.kind, UsageKind::Restock);
        assert_eq!(record.delta, 5);
        assert_eq!(item.quantity, 6);

        // Restocking downwards is allowed and recorded as restock
        let record = restock(&mut item, 2, t0()).unwrap();
        assert_eq!(record.delta, -4);
    }

    #[test]
    fn test_restock_same_quantity_is_noop() {
        let mut item = item_with(4);
        let before = item.clone();
        assert!(restock(&mut item, 4, t0() + Duration::days(1)).is_none());
        assert_eq!(item, before);
    }

    #[test]
    fn test_revert_head_matching_timestamp() {
        let mut item = item_with(10);
        let record = adjust(&mut item, -3, t0()).unwrap();
        let undo_at = t0() + Duration::seconds(2);

        assert!(revert_head(&mut item, &record, undo_at));
        assert_eq!(item.quantity, 10);
        assert!(item.usage_history.is_empty());
        assert_eq!(item.updated_at, undo_at);
    }

    #[test]
    fn test_revert_head_stale_timestamp() {
        let mut item = item_with(10);
        let first = adjust(&mut item, -3, t0()).unwrap();
        restock(&mut item, 10, t0() + Duration::seconds(1)).unwrap();

        let before = item.clone();
        assert!(!revert_head(&mut item, &first, t0() + Duration::seconds(2)));
        assert_eq!(item, before);
    }

    #[test]
    fn test_revert_head_same_timestamp_other_record() {
        let mut item = item_with(10);
        let consumed = adjust(&mut item, -3, t0()).unwrap();
        restock(&mut item, 20, t0()).unwrap();

        let before = item.clone();
        assert!(!revert_head(&mut item, &consumed, t0()));
        assert_eq!(item, before);
        assert_eq!(item.quantity, 20);
    }

    #[test]
    fn test_revert_head_empty_history() {
        let mut item = item_with(3);
        let record = UsageRecord {
            timestamp: t0(),
            kind: UsageKind::Consume,
            delta: -1,
            previous_quantity: 4,
            new_quantity: 3,
        };
        assert!(!revert_head(&mut item, &record, t0()));
    }

    #[test]
    fn test_adjust_saturates_at_max() {
        let mut item = item_with(u32::MAX - 1);
        let record = adjust(&mut item, i64::MAX, t0()).unwrap();
        assert_eq!(item.quantity, u32::MAX);
        assert_eq!(record.delta, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: adjust always lands on max(0, quantity + delta) and
        /// records exactly when the quantity moved.
        #[test]
        fn adjust_floors_at_zero(quantity in 0u32..10_000, delta in -20_000i64..20_000) {
            let mut item = item_with(quantity);
            let expected = (i64::from(quantity) + delta).max(0) as u32;

            let record = adjust(&mut item, delta, t0());

            prop_assert_eq!(item.quantity, expected);
            prop_assert_eq!(record.is_some(), expected != quantity);
            prop_assert_eq!(item.usage_history.len(), usize::from(expected != quantity));
            if let Some(r) = record {
                prop_assert_eq!(i64::from(r.previous_quantity) + r.delta, i64::from(r.new_quantity));
            }
        }
    }
}
