//! Spreadsheet exports on disk.

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use super::extract_rows;
use crate::error::{Error, Result};
use crate::normalize::RawRecord;

/// Load raw rows from a `.json` or `.csv` export.
pub fn load_rows(path: &Path) -> Result<Vec<RawRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "json" => read_json_rows(std::fs::File::open(path)?)?,
        "csv" => read_csv_rows(std::fs::File::open(path)?)?,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    };

    tracing::info!(rows = rows.len(), path = %path.display(), "Loaded rows");
    Ok(rows)
}

/// Rows from a JSON document, in any shape [`extract_rows`] accepts.
pub fn read_json_rows<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_reader(reader)?;
    extract_rows(value)
}

/// Rows from CSV with a header line.
///
/// Every cell becomes a string value. Blank cells are left out so the
/// normalizer's field fallbacks apply to them.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.trim().is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
