//! Row sources
//!
//! The analytics core only consumes a materialized list of raw rows. This
//! module produces one from a spreadsheet export on disk ([`load_rows`]) or
//! from the deployed Apps Script endpoint ([`SheetClient`]).

mod file;
mod sheet;

pub use file::{load_rows, read_csv_rows, read_json_rows};
pub use sheet::{SheetClient, SyncSheetClient};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::normalize::RawRecord;

/// Keys the endpoint may nest the row array under, checked in order.
const ROW_KEYS: [&str; 4] = ["data", "tasks", "studyTasks", "rows"];

/// Pull the row list out of a parsed response body or export file.
///
/// Accepts a bare array, or an object carrying the array under one of
/// [`ROW_KEYS`]. Array items that are not objects are skipped. An object
/// with `"success": false` is reported as an upstream failure.
pub fn extract_rows(value: Value) -> Result<Vec<RawRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if map.get("success") == Some(&Value::Bool(false)) {
                let reason = ["error", "message"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .unwrap_or("no reason given");
                return Err(Error::Source(format!("upstream reported failure: {}", reason)));
            }
            let key = ROW_KEYS
                .iter()
                .copied()
                .find(|key| map.get(*key).is_some_and(Value::is_array))
                .ok_or_else(|| {
                    Error::Source(format!("no row array under any of {:?}", ROW_KEYS))
                })?;
            match map.remove(key) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => {
            return Err(Error::Source(format!(
                "expected an array or object of rows, got {}",
                kind(&other)
            )))
        }
    };

    let total = items.len();
    let rows: Vec<RawRecord> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect();
    if rows.len() < total {
        tracing::warn!(skipped = total - rows.len(), "Skipped non-object rows");
    }
    Ok(rows)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_rows_root_array() {
        let rows = extract_rows(json!([{"subject": "Math"}, 42, {"subject": "Bio"}])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["subject"], "Bio");
    }

    #[test]
    fn test_extract_rows_wrapped() {
        let rows = extract_rows(json!({"success": true, "data": [{"subject": "Math"}]})).unwrap();
        assert_eq!(rows.len(), 1);

        // first key holding an array wins
        let rows = extract_rows(json!({
            "data": "not rows",
            "studyTasks": [{"a": 1}, {"b": 2}],
            "rows": [{"c": 3}]
        }))
        .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_extract_rows_upstream_failure() {
        let err = extract_rows(json!({"success": false, "error": "Sheet not found"})).unwrap_err();
        assert!(matches!(err, Error::Source(_)));
        assert!(err.to_string().contains("Sheet not found"));
    }

    #[test]
    fn test_extract_rows_rejects_other_shapes() {
        assert!(extract_rows(json!({"status": "ok"})).is_err());
        assert!(extract_rows(json!("rows")).is_err());
    }
}
