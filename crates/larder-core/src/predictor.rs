//! # Consumption Predictor
//!
//! Estimates how many days an item's current stock will last, from its
//! usage history alone.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 estimate_days_remaining(item)                           │
//! │                                                                         │
//! │  quantity == 0 ─────────────────────────────────────────────► Some(0)   │
//! │                                                                         │
//! │  events = consume records + adjust records with delta < 0              │
//! │                                                                         │
//! │  0 events ──────────────────────────────────────────────────► None      │
//! │                                                                         │
//! │  1 event   elapsed = event.ts - created_at                             │
//! │            elapsed < 12h ───────────────────────────────────► None      │
//! │            rate = |delta| / elapsed                                     │
//! │                                                                         │
//! │  2+ events window = 10 newest                                          │
//! │            span   = window[0].ts - window[last].ts                     │
//! │            amount = Σ|delta| of window minus the oldest entry          │
//! │                                                                         │
//! │            span < 0.05d or amount == 0 ──► lifetime fallback:          │
//! │                days   = window[0].ts - created_at                      │
//! │                amount = Σ|delta| of every event                        │
//! │                days <= 0.5 ─────────────────────────────────► None      │
//! │                                                                         │
//! │  result = round(quantity / rate)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The oldest window entry's own amount is left out of the windowed rate:
//! it was consumed before the window's first timestamp, so the rate counts
//! only what was used *between* sampled events.

use chrono::{DateTime, Utc};

use crate::types::Item;

/// Maximum number of recent consumption events in the sampling window.
pub const WINDOW_SIZE: usize = 10;

/// Shortest creation-to-event gap trusted for a single-event estimate (12h).
pub const MIN_SINGLE_EVENT_DAYS: f64 = 0.5;

/// Shortest window span trusted for a windowed rate (~72 minutes).
pub const MIN_WINDOW_SPAN_DAYS: f64 = 0.05;

/// Lifetime span that must be exceeded for the fallback rate.
pub const MIN_LIFETIME_DAYS: f64 = 0.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Estimated days until the item runs out, or `None` when the history
/// does not support a reliable rate.
pub fn estimate_days_remaining(item: &Item) -> Option<i64> {
    if item.quantity == 0 {
        return Some(0);
    }

    let events: Vec<_> = item.consumption_records().collect();
    let quantity = f64::from(item.quantity);

    match events.as_slice() {
        [] => None,
        [only] => {
            let elapsed = days_between(item.created_at, only.timestamp);
            if elapsed < MIN_SINGLE_EVENT_DAYS {
                return None;
            }
            project(quantity, only.magnitude() as f64, elapsed)
        }
        _ => {
            let window = &events[..events.len().min(WINDOW_SIZE)];
            let newest = window[0];
            let oldest = window[window.len() - 1];

            let span = days_between(oldest.timestamp, newest.timestamp);
            let consumed: u64 = window[..window.len() - 1]
                .iter()
                .map(|r| r.magnitude())
                .sum();

            if span < MIN_WINDOW_SPAN_DAYS || consumed == 0 {
                let lifetime_days = days_between(item.created_at, newest.timestamp);
                let lifetime_consumed: u64 = events.iter().map(|r| r.magnitude()).sum();
                if lifetime_days > MIN_LIFETIME_DAYS {
                    return project(quantity, lifetime_consumed as f64, lifetime_days);
                }
                return None;
            }

            project(quantity, consumed as f64, span)
        }
    }
}

/// Days from `from` to `to` as a fraction.
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// `round(quantity / (amount / days))`, `None` for a zero rate.
fn project(quantity: f64, amount: f64, days: f64) -> Option<i64> {
    let rate = amount / days;
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    Some((quantity / rate).round() as i64)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UsageKind, UsageRecord};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn item(quantity: u32, history: Vec<UsageRecord>) -> Item {
        Item {
            id: "item-1".to_string(),
            name: "Detergent".to_string(),
            quantity,
            unit: "bottle".to_string(),
            threshold: 1,
            target_quantity: quantity,
            expiration_date: None,
            usage_history: history,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn record(kind: UsageKind, at: DateTime<Utc>, delta: i64) -> UsageRecord {
        // previous/new are irrelevant to the predictor
        UsageRecord {
            timestamp: at,
            kind,
            delta,
            previous_quantity: 100,
            new_quantity: (100 + delta) as u32,
        }
    }

    fn consume(at: DateTime<Utc>, delta: i64) -> UsageRecord {
        record(UsageKind::Consume, at, delta)
    }

    #[test]
    fn test_zero_quantity_is_zero_days() {
        let history = vec![consume(t0() + Duration::days(1), -1)];
        assert_eq!(estimate_days_remaining(&item(0, history)), Some(0));
        assert_eq!(estimate_days_remaining(&item(0, Vec::new())), Some(0));
    }

    #[test]
    fn test_empty_history_is_unknown() {
        assert_eq!(estimate_days_remaining(&item(5, Vec::new())), None);
    }

    #[test]
    fn test_restocks_and_increases_are_ignored() {
        let history = vec![
            record(UsageKind::Restock, t0() + Duration::days(2), -3),
            record(UsageKind::Adjust, t0() + Duration::days(1), 2),
        ];
        assert_eq!(estimate_days_remaining(&item(5, history)), None);
    }

    #[test]
    fn test_single_event_uses_creation_time() {
        // 2 consumed over 4 days => 0.5/day; 6 left => 12 days
        let history = vec![consume(t0() + Duration::days(4), -2)];
        assert_eq!(estimate_days_remaining(&item(6, history)), Some(12));
    }

    #[test]
    fn test_single_event_too_soon_is_unknown() {
        let history = vec![consume(t0() + Duration::hours(11), -2)];
        assert_eq!(estimate_days_remaining(&item(6, history)), None);
    }

    #[test]
    fn test_single_negative_adjust_counts_as_consumption() {
        let history = vec![record(UsageKind::Adjust, t0() + Duration::days(2), -1)];
        // 1 per 2 days => 4 left lasts 8 days
        assert_eq!(estimate_days_remaining(&item(4, history)), Some(8));
    }

    #[test]
    fn test_window_excludes_oldest_delta() {
        // Newest first. Span is 2 days; only the two newer deltas (1 + 1)
        // count, so the rate is 1/day. Counting the oldest (10) would give
        // 6/day and a 1-day estimate instead.
        let history = vec![
            consume(t0() + Duration::days(3), -1),
            consume(t0() + Duration::days(2), -1),
            consume(t0() + Duration::days(1), -10),
        ];
        assert_eq!(estimate_days_remaining(&item(5, history)), Some(5));
    }

    #[test]
    fn test_window_limited_to_ten_events() {
        // 12 daily events of 1. The window covers the 10 newest: span 9 days,
        // 9 counted => 1/day. The two oldest carry huge deltas that would
        // change the answer if they leaked in.
        let mut history: Vec<UsageRecord> = (0..10)
            .map(|i| consume(t0() + Duration::days(20 - i), -1))
            .collect();
        history.push(consume(t0() + Duration::days(10), -50));
        history.push(consume(t0() + Duration::days(9), -50));

        assert_eq!(estimate_days_remaining(&item(7, history)), Some(7));
    }

    #[test]
    fn test_clustered_window_falls_back_to_lifetime() {
        // Two events a minute apart, ten days after creation.
        // Lifetime: 4 consumed over 10 days => 0.4/day; 8 left => 20 days.
        let history = vec![
            consume(t0() + Duration::days(10), -2),
            consume(t0() + Duration::days(10) - Duration::minutes(1), -2),
        ];
        assert_eq!(estimate_days_remaining(&item(8, history)), Some(20));
    }

    #[test]
    fn test_clustered_window_on_young_item_is_unknown() {
        let history = vec![
            consume(t0() + Duration::hours(6), -1),
            consume(t0() + Duration::hours(6) - Duration::minutes(5), -1),
        ];
        assert_eq!(estimate_days_remaining(&item(8, history)), None);
    }

    #[test]
    fn test_zero_window_amount_falls_back_to_lifetime() {
        // Imported history can carry zero deltas.
        let history = vec![
            consume(t0() + Duration::days(4), 0),
            consume(t0() + Duration::days(2), -4),
        ];
        // Lifetime: 4 over 4 days => 1/day
        assert_eq!(estimate_days_remaining(&item(3, history)), Some(3));
    }

    #[test]
    fn test_all_zero_deltas_is_unknown() {
        let history = vec![
            consume(t0() + Duration::days(4), 0),
            consume(t0() + Duration::days(2), 0),
        ];
        assert_eq!(estimate_days_remaining(&item(3, history)), None);
    }

    #[test]
    fn test_result_is_rounded() {
        // 3 over 2 days => 1.5/day; 4 left => 2.67 => 3
        let history = vec![
            consume(t0() + Duration::days(3), -3),
            consume(t0() + Duration::days(1), -1),
        ];
        assert_eq!(estimate_days_remaining(&item(4, history)), Some(3));
    }
}
