//! # studyflow-core
//!
//! Core library for StudyFlow - study task analytics.
//!
//! This library provides:
//! - The canonical [`Task`] type and the permissive [`TaskNormalizer`]
//! - Pure aggregation functions and report assemblers ([`analytics`])
//! - Row sources for spreadsheet exports and the Apps Script endpoint
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Raw:** Untyped spreadsheet rows (JSON export, CSV, or the web endpoint)
//! - **Canonical:** Normalized [`Task`] records
//! - **Derived:** Aggregates and reports, recomputed on every call
//!
//! ## Example
//!
//! ```rust,no_run
//! use studyflow_core::analytics::{build_study_report, ReportOptions};
//! use studyflow_core::{source, Config, TaskNormalizer};
//!
//! let config = Config::load().expect("failed to load config");
//! let rows = source::load_rows("study_tasks.json".as_ref()).expect("failed to load rows");
//! let tasks = TaskNormalizer::new().normalize(&rows);
//!
//! let today = chrono::Local::now().date_naive();
//! let report = build_study_report(&tasks, &ReportOptions::from_config(&config, today));
//! println!("{} tasks, {}% correct", report.overall.total, report.overall.accuracy_percent);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use normalize::{is_correct, RawRecord, TaskNormalizer};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod normalize;
pub mod source;
pub mod types;
