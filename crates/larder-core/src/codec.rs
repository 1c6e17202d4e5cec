//! # Import / Export Codec
//!
//! Serializes the item collection to CSV or JSON, parses imported content
//! back into items, and plans the merge of imported items into the current
//! collection.
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CSV export                                                             │
//! │  ──────────                                                             │
//! │  <BOM>id,name,quantity,unit,threshold,targetQuantity,expirationDate,   │
//! │       createdAt,updatedAt,usageHistory                                  │
//! │  "6f1c…","He said, ""hi""",3,"pcs",1,4,,1700000000000,…,"[{…}]"        │
//! │                                                                         │
//! │  • text and usageHistory cells always quoted, inner quotes doubled     │
//! │  • numbers and epoch-ms timestamps are bare, absent date is empty      │
//! │  • usageHistory is the JSON array of records                           │
//! │                                                                         │
//! │  JSON export                                                            │
//! │  ───────────                                                            │
//! │  pretty-printed array of items, fields in declaration order            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Import Pipeline
//! ```text
//! content ─► strip BOM ─► JSON array? ──yes──► objects ─┐
//!                              │                         │
//!                              no                        ▼
//!                              └──► CSV rows by header ─► coerce_record ─► Vec<Item>
//!                                                          (drops rows without id/name)
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::coerce::coerce_record;
use crate::error::{ExportResult, ImportError, ImportResult};
use crate::types::Item;

// =============================================================================
// Constants
// =============================================================================

/// Column order of the CSV format.
pub const CSV_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "quantity",
    "unit",
    "threshold",
    "targetQuantity",
    "expirationDate",
    "createdAt",
    "updatedAt",
    "usageHistory",
];

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
pub const BOM: char = '\u{feff}';

// =============================================================================
// Export
// =============================================================================

/// Renders the collection as CSV, BOM-prefixed, one row per item.
///
/// Text cells are always quoted, even when they look numeric, so a name
/// like `"7"` survives a spreadsheet round trip as text.
pub fn export_csv(items: &[Item]) -> ExportResult<String> {
    let mut out = String::with_capacity(128 * (items.len() + 1));
    out.push(BOM);
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');

    for item in items {
        let history = serde_json::to_string(&item.usage_history)?;
        let cells = [
            quoted(&item.id),
            quoted(&item.name),
            item.quantity.to_string(),
            quoted(&item.unit),
            item.threshold.to_string(),
            item.target_quantity.to_string(),
            item.expiration_date
                .map(|d| d.timestamp_millis().to_string())
                .unwrap_or_default(),
            item.created_at.timestamp_millis().to_string(),
            item.updated_at.timestamp_millis().to_string(),
            quoted(&history),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    Ok(out)
}

/// Wraps a cell in double quotes, doubling any inside.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Renders the collection as a pretty-printed JSON array.
pub fn export_json(items: &[Item]) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

// =============================================================================
// Import
// =============================================================================

/// Parses imported content into items.
///
/// JSON is tried first; anything that is not a JSON array is read as CSV.
/// `now` is the fallback for unreadable timestamps.
///
/// ## Errors
/// - [`ImportError::Empty`] for blank content
/// - [`ImportError::Unparseable`] when the CSV header cannot be read
/// - [`ImportError::NoValidRecords`] when nothing carried both id and name
pub fn parse_import(content: &str, now: DateTime<Utc>) -> ImportResult<Vec<Item>> {
    let content = content.trim_start_matches(BOM);
    if content.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let items = match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(entries)) => {
            debug!(entries = entries.len(), "Import content is a JSON array");
            entries
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|fields| coerce_record(fields, now))
                .collect::<Vec<_>>()
        }
        _ => {
            debug!("Import content is not a JSON array, reading as CSV");
            parse_csv_rows(content)?
                .iter()
                .filter_map(|fields| coerce_record(fields, now))
                .collect()
        }
    };

    if items.is_empty() {
        return Err(ImportError::NoValidRecords);
    }
    Ok(items)
}

/// Reads CSV content into header-keyed string maps.
fn parse_csv_rows(content: &str) -> ImportResult<Vec<Map<String, Value>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Unparseable(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = index + 1, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        let fields: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(fields);
    }

    Ok(rows)
}

// =============================================================================
// Merge
// =============================================================================

/// Result of merging imported items into a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged collection.
    pub items: Vec<Item>,
    /// Imported items whose id was new.
    pub added: usize,
    /// Existing items replaced by an imported record.
    pub replaced: usize,
}

/// Merges `incoming` into `current` by id.
///
/// An imported record replaces the whole existing item (history included);
/// there is no field-level merge. Existing items keep their position, new
/// ones are appended in import order, and ids absent from the import are
/// untouched. When the import repeats an id, the last record wins.
pub fn merge(current: Vec<Item>, incoming: Vec<Item>) -> MergeOutcome {
    let mut items = current;
    let mut index: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.clone(), i))
        .collect();
    let existing = items.len();

    let mut added = 0;
    let mut replaced = 0;

    for item in incoming {
        match index.get(&item.id) {
            Some(&i) => {
                if i < existing {
                    replaced += 1;
                }
                items[i] = item;
            }
            None => {
                index.insert(item.id.clone(), items.len());
                items.push(item);
                added += 1;
            }
        }
    }

    MergeOutcome {
        items,
        added,
        replaced,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UsageKind, UsageRecord};
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn item(id: &str, name: &str, quantity: u32) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            unit: "pcs".to_string(),
            threshold: 1,
            target_quantity: quantity,
            expiration_date: None,
            usage_history: Vec::new(),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn with_history(mut item: Item, records: usize) -> Item {
        for i in 0..records {
            let prev = item.quantity;
            item.quantity = prev + 1;
            item.usage_history.insert(
                0,
                UsageRecord {
                    timestamp: t0() + Duration::hours(i as i64 + 1),
                    kind: UsageKind::Adjust,
                    delta: 1,
                    previous_quantity: prev,
                    new_quantity: prev + 1,
                },
            );
        }
        item
    }

    fn sample_collection() -> Vec<Item> {
        let mut soap = with_history(item("a", "He said, \"hi\"", 2), 2);
        soap.expiration_date = Some(t0() + Duration::days(30));
        let mut rice = item("b", "Rice", 0);
        rice.unit = "bag,\nlarge".to_string();
        vec![soap, rice]
    }

    #[test]
    fn test_csv_header_and_bom() {
        let csv = export_csv(&sample_collection()).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        let header = csv.trim_start_matches(BOM).lines().next().unwrap();
        assert_eq!(
            header,
            "id,name,quantity,unit,threshold,targetQuantity,expirationDate,createdAt,updatedAt,usageHistory"
        );
    }

    #[test]
    fn test_csv_quotes_text_and_doubles_inner_quotes() {
        let csv = export_csv(&[item("a", "He said, \"hi\"", 3)]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"a\",\"He said, \"\"hi\"\"\",3,\"pcs\",1,3,"));
        assert!(row.ends_with(",\"[]\""));
    }

    #[test]
    fn test_csv_quotes_numeric_looking_text() {
        let csv = export_csv(&[item("7", "42", 1)]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"7\",\"42\",1,"));
    }

    #[test]
    fn test_csv_round_trip() {
        let items = sample_collection();
        let csv = export_csv(&items).unwrap();
        let parsed = parse_import(&csv, t0() + Duration::days(99)).unwrap();
        assert_eq!(parsed, items);
        assert_eq!(parsed[0].name, "He said, \"hi\"");
    }

    #[test]
    fn test_json_round_trip() {
        let items = sample_collection();
        let json = export_json(&items).unwrap();
        assert!(json.contains("\n  {"));
        let parsed = parse_import(&json, t0() + Duration::days(99)).unwrap();
        assert_eq!(parsed, items);
    }

    #[test]
    fn test_csv_import_handles_crlf_and_unknown_columns() {
        let content = "name,id,color,quantity\r\n\"Tea\",t1,green,4\r\nCoffee,c1,brown,\"2\"\r\n";
        let parsed = parse_import(content, t0()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "t1");
        assert_eq!(parsed[0].quantity, 4);
        assert_eq!(parsed[1].name, "Coffee");
        assert_eq!(parsed[1].quantity, 2);
        // Missing columns default
        assert_eq!(parsed[1].threshold, 0);
        assert_eq!(parsed[1].created_at, t0());
        assert!(parsed[1].usage_history.is_empty());
    }

    #[test]
    fn test_csv_import_bad_history_cell_defaults_to_empty() {
        let content = "id,name,usageHistory\nx,Salt,\"[broken\"\n";
        let parsed = parse_import(content, t0()).unwrap();
        assert!(parsed[0].usage_history.is_empty());
    }

    #[test]
    fn test_import_drops_rows_without_id_or_name() {
        let content = "id,name\n,NoId\nn1,\nok,Fine\n";
        let parsed = parse_import(content, t0()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "ok");
    }

    #[test]
    fn test_import_rejections() {
        assert_eq!(parse_import("   ", t0()), Err(ImportError::Empty));
        assert_eq!(parse_import("\u{feff}", t0()), Err(ImportError::Empty));
        assert_eq!(
            parse_import("[{\"id\": \"a\"}]", t0()),
            Err(ImportError::NoValidRecords)
        );
        assert_eq!(
            parse_import("just some words", t0()),
            Err(ImportError::NoValidRecords)
        );
        assert_eq!(
            parse_import("id,name\n", t0()),
            Err(ImportError::NoValidRecords)
        );
    }

    #[test]
    fn test_json_object_falls_back_to_csv_and_is_rejected() {
        let result = parse_import("{\"id\":\"a\",\"name\":\"b\"}", t0());
        assert_eq!(result, Err(ImportError::NoValidRecords));
    }

    #[test]
    fn test_merge_replaces_whole_record() {
        let existing = with_history(item("a", "Soap", 1), 3);
        let other = item("b", "Rice", 5);
        let incoming = with_history(item("a", "Hand soap", 9), 1);

        let outcome = merge(vec![existing, other.clone()], vec![incoming.clone()]);

        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.items[0], incoming);
        assert_eq!(outcome.items[0].usage_history.len(), 1);
        assert_eq!(outcome.items[1], other);
    }

    #[test]
    fn test_merge_appends_new_ids_and_last_duplicate_wins() {
        let outcome = merge(
            vec![item("a", "Soap", 1)],
            vec![item("c", "Tea", 1), item("c", "Green tea", 2)],
        );
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.replaced, 0);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[1].name, "Green tea");
    }
}
