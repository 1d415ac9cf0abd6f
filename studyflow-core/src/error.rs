//! Error types for studyflow-core

use thiserror::Error;

/// Main error type for the studyflow-core library
///
/// Only the I/O boundaries (config, row sources, logging) produce errors.
/// Normalization and analytics degrade to defaults instead.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Row source (spreadsheet endpoint) error
    #[error("source error: {0}")]
    Source(String),

    /// Input file with an extension we cannot read
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for studyflow-core
pub type Result<T> = std::result::Result<T, Error>;
