//! Task normalization
//!
//! Converts loosely-typed spreadsheet rows into canonical [`Task`]s.
//!
//! ## Design Principles
//!
//! 1. **Permissive**: no row is ever rejected; every missing or malformed
//!    field degrades to a documented default
//! 2. **Single predicate**: correctness is decided by [`is_correct`] and
//!    nowhere else
//! 3. **Deterministic**: apart from the processing-time date fallback,
//!    the same rows always produce the same tasks
//!
//! ## Field fallback chains
//!
//! | Task field | Source fields (first usable wins) | Default |
//! |------------|-----------------------------------|---------|
//! | `id` | `task_id`, `id` | `row-{n}` |
//! | `name` | `task_name`, `name` | empty |
//! | `subject` | `subject`, `przedmiot` | `Unknown` |
//! | `categories` | `categories`, `category` | `["Unknown"]` |
//! | `correct` | `correctly_completed`, `correctness`, `correct` | `false` |
//! | `date` | `start_time`, `timestamp` | processing time |
//! | `location` | `location`, truthy `W szkole` | `Unspecified` |

use crate::types::{Task, UNKNOWN_LABEL, UNSPECIFIED_LOCATION};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// An untyped spreadsheet row.
pub type RawRecord = Map<String, Value>;

/// Lower-cased strings that count as a correct outcome.
const CORRECT_VALUES: [&str; 4] = ["poprawnie", "dobrze", "true", "correct"];

/// Spreadsheet column marking a task done at school.
const AT_SCHOOL_COLUMN: &str = "W szkole";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Decide whether a correctness value means "correct".
///
/// Booleans are taken as-is. Strings are trimmed, lower-cased and matched
/// against `poprawnie`, `dobrze`, `true` and `correct`. Anything else,
/// including numbers and null, is incorrect.
pub fn is_correct(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            CORRECT_VALUES.contains(&s.as_str())
        }
        _ => false,
    }
}

/// Parse a sheet timestamp, keeping the recorded wall-clock time.
///
/// Date-only values have no time of day and yield `None`; use
/// [`parse_date`] for those.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse the calendar date of a sheet timestamp or bare `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|t| t.date()).or_else(|| {
        let raw = raw.trim();
        raw.get(..10)
            .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
    })
}

/// Converts raw rows into canonical tasks.
#[derive(Debug, Clone)]
pub struct TaskNormalizer {
    now: NaiveDateTime,
}

impl Default for TaskNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskNormalizer {
    /// Normalizer whose date fallback is the current local time.
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Normalizer with a fixed processing time.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Normalize every row, in order.
    pub fn normalize(&self, rows: &[RawRecord]) -> Vec<Task> {
        let tasks: Vec<Task> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.normalize_record(index, row))
            .collect();

        let inferred = tasks.iter().filter(|t| t.date_inferred).count();
        tracing::debug!(
            rows = rows.len(),
            inferred_dates = inferred,
            "Normalized study task rows"
        );

        tasks
    }

    /// Normalize a single row. `index` is the 0-based row position.
    pub fn normalize_record(&self, index: usize, row: &RawRecord) -> Task {
        let id = first_text(row, &["task_id", "id"]).unwrap_or_else(|| format!("row-{}", index + 1));
        let name = first_text(row, &["task_name", "name"]).unwrap_or_default();
        let subject =
            first_text(row, &["subject", "przedmiot"]).unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        let categories = ["categories", "category"]
            .iter()
            .filter_map(|key| row.get(*key))
            .map(category_list)
            .find(|list| !list.is_empty())
            .unwrap_or_else(|| vec![UNKNOWN_LABEL.to_string()]);

        let correct = correctness_value(row).is_some_and(|v| is_correct(&v));

        let start_raw = text(row, "start_time");
        let timestamp_raw = text(row, "timestamp");
        let start_time = start_raw.as_deref().and_then(parse_timestamp);
        let end_time = text(row, "end_time").as_deref().and_then(parse_timestamp);
        let recorded_at = timestamp_raw.as_deref().and_then(parse_timestamp);

        let derived = start_raw
            .as_deref()
            .and_then(parse_date)
            .or_else(|| timestamp_raw.as_deref().and_then(parse_date));
        let date_inferred = derived.is_none();
        let date = derived.unwrap_or_else(|| self.now.date());
        if date_inferred {
            tracing::warn!(
                task_id = %id,
                fallback_date = %date,
                "Task has no usable start_time or timestamp, attributing it to processing date"
            );
        }

        let location = text(row, "location")
            .or_else(|| {
                row.get(AT_SCHOOL_COLUMN)
                    .filter(|v| is_truthy(v))
                    .map(|_| AT_SCHOOL_COLUMN.to_string())
            })
            .unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string());

        let session_id = text(row, "session_id");

        Task {
            id,
            name,
            subject,
            categories,
            correct,
            start_time,
            end_time,
            recorded_at,
            date,
            date_inferred,
            location,
            session_id,
        }
    }
}

/// Trimmed, non-empty text for a field. Numbers and booleans are rendered.
fn text(row: &RawRecord, key: &str) -> Option<String> {
    row.get(key).and_then(value_text)
}

fn first_text(row: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(row, key))
}

fn value_text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Split a category field into distinct, trimmed labels (source order kept).
fn category_list(value: &Value) -> Vec<String> {
    let pieces: Vec<String> = match value {
        Value::String(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        other => value_text(other).into_iter().collect(),
    };

    let mut categories: Vec<String> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if !piece.is_empty() && !categories.contains(&piece) {
            categories.push(piece);
        }
    }
    categories
}

/// The upstream correctness value, with `correctly_completed == "Yes"`
/// folded into a boolean before the shared string rule applies.
fn correctness_value(row: &RawRecord) -> Option<Value> {
    if let Some(value) = row.get("correctly_completed").filter(|v| !v.is_null()) {
        return Some(match value {
            Value::String(s) if s.trim().eq_ignore_ascii_case("yes") => Value::Bool(true),
            other => other.clone(),
        });
    }
    ["correctness", "correct"]
        .iter()
        .find_map(|key| row.get(*key).filter(|v| !v.is_null()).cloned())
}

/// Checkbox-style truthiness used by flag columns.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}
