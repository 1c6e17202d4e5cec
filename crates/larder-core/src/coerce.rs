//! # Field Coercion
//!
//! Total conversion of loosely-typed import fields into typed values.
//!
//! Imported content comes from spreadsheets and hand-edited JSON: numbers
//! arrive as text, timestamps as either epoch milliseconds or RFC 3339,
//! history as a JSON string inside a CSV cell. Every function here accepts
//! any `serde_json::Value` and returns a typed value, falling back to a
//! default instead of failing. CSV and JSON imports go through the same
//! functions.
//!
//! ## Coercion Table
//! ```text
//! ┌────────────────────┬────────────────────────────────┬──────────────────┐
//! │ Field              │ Accepted                       │ Fallback         │
//! ├────────────────────┼────────────────────────────────┼──────────────────┤
//! │ id, name           │ non-blank string or number     │ record rejected  │
//! │ unit               │ string or number               │ ""               │
//! │ quantity,          │ integer, float (truncated),    │ 0                │
//! │ threshold,         │ numeric text; negatives → 0    │                  │
//! │ targetQuantity     │                                │                  │
//! │ createdAt,         │ epoch ms (number or text),     │ now              │
//! │ updatedAt          │ RFC 3339 text                  │                  │
//! │ expirationDate     │ same as above                  │ absent           │
//! │ usageHistory       │ array, or JSON text of array   │ []               │
//! └────────────────────┴────────────────────────────────┴──────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::types::{Item, UsageRecord};

/// Coerces a value into a non-negative count.
pub fn to_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                clamp_count(i)
            } else if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else {
                n.as_f64().map(float_count).unwrap_or(0)
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                clamp_count(i)
            } else {
                s.parse::<f64>().map(float_count).unwrap_or(0)
            }
        }
        _ => 0,
    }
}

/// Coerces a value into a timestamp, or `fallback` when it cannot.
pub fn to_timestamp(value: Option<&Value>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    to_optional_timestamp(value).unwrap_or(fallback)
}

/// Coerces a value into a timestamp; blank, null and unreadable values are
/// `None`.
pub fn to_optional_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(ms) = s.parse::<i64>() {
                return DateTime::from_timestamp_millis(ms);
            }
            if let Ok(ms) = s.parse::<f64>() {
                return ms
                    .is_finite()
                    .then(|| ms.trunc() as i64)
                    .and_then(DateTime::from_timestamp_millis);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

/// Coerces a value into text. Numbers are rendered, anything else is `None`.
pub fn to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerces a value into a usage history.
///
/// Accepts an array, or a string holding a JSON array (the CSV cell form).
/// Elements that are not well-formed usage records are dropped.
pub fn to_history(value: Option<&Value>) -> Vec<UsageRecord> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Array(_)) => to_history(Some(&parsed)),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Builds an item from a loosely-typed record.
///
/// Returns `None` when the record lacks a non-blank `id` or `name`; every
/// other field falls back per the coercion table.
pub fn coerce_record(fields: &Map<String, Value>, now: DateTime<Utc>) -> Option<Item> {
    let id = non_blank(to_text(fields.get("id")))?;
    let name = non_blank(to_text(fields.get("name")))?;

    Some(Item {
        id,
        name,
        quantity: to_count(fields.get("quantity")),
        unit: to_text(fields.get("unit")).unwrap_or_default(),
        threshold: to_count(fields.get("threshold")),
        target_quantity: to_count(fields.get("targetQuantity")),
        expiration_date: to_optional_timestamp(fields.get("expirationDate")),
        usage_history: to_history(fields.get("usageHistory")),
        created_at: to_timestamp(fields.get("createdAt"), now),
        updated_at: to_timestamp(fields.get("updatedAt"), now),
    })
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.trim().is_empty())
}

fn clamp_count(i: i64) -> u32 {
    i.clamp(0, i64::from(u32::MAX)) as u32
}

fn float_count(f: f64) -> u32 {
    if f.is_finite() {
        clamp_count(f.trunc() as i64)
    } else {
        0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
