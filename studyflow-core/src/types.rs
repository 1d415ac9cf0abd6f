//! Core domain types for StudyFlow
//!
//! These types represent the canonical data model that every aggregation
//! pass consumes, plus the small value types shared by all of them.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Task** | One logged study activity with a correctness outcome |
//! | **Subject** | Top-level academic area (e.g., "Matematyka") |
//! | **Category** | Sub-topic tag; a task may carry several |
//! | **Session** | Tasks performed in one sitting, linked by `session_id` |
//! | **Accuracy** | Percentage of tasks marked correct within a group |

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Sentinel for a missing subject or category.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Sentinel for a missing location.
pub const UNSPECIFIED_LOCATION: &str = "Unspecified";

/// A bucket with fewer tasks than this is never weak.
pub const WEAK_MIN_TASKS: usize = 3;

/// Accuracy strictly below this marks a (sufficiently sampled) bucket as weak.
pub const WEAK_ACCURACY_BELOW: u32 = 60;

/// Accuracy at or above this marks a bucket as strong, regardless of sample size.
pub const STRONG_ACCURACY_FROM: u32 = 80;

// ============================================
// Task
// ============================================

/// A canonical study task.
///
/// Produced by [`TaskNormalizer`](crate::TaskNormalizer); every field is
/// populated, falling back to a documented default when the source row
/// was missing or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the data source
    pub id: String,
    /// Display label
    pub name: String,
    /// Exactly one subject, never empty
    pub subject: String,
    /// Distinct category labels in source order, never empty
    pub categories: Vec<String>,
    /// Normalized correctness outcome
    pub correct: bool,
    /// When work on the task started
    pub start_time: Option<NaiveDateTime>,
    /// When work on the task ended
    pub end_time: Option<NaiveDateTime>,
    /// Row timestamp written by the sheet
    pub recorded_at: Option<NaiveDateTime>,
    /// Calendar day the task is attributed to
    pub date: NaiveDate,
    /// True when `date` came from the processing-time fallback
    pub date_inferred: bool,
    /// Where the task was done, `Unspecified` when unknown
    pub location: String,
    /// Sitting this task belongs to
    pub session_id: Option<String>,
}

impl Task {
    /// Hour of day (0-23) the task happened, from start time or row timestamp.
    pub fn hour(&self) -> Option<u32> {
        self.start_time.or(self.recorded_at).map(|t| t.hour())
    }

    /// Whether the task is tagged with the given category.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Minutes between start and end, when both are known and ordered.
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end >= start => {
                Some(end.signed_duration_since(start).num_minutes())
            }
            _ => None,
        }
    }
}

// ============================================
// Aggregates
// ============================================

/// `round(100 * correct / total)`, or 0 for an empty group.
pub fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

/// Correctness counts for an arbitrary group of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy_percent: u32,
}

impl TaskStats {
    pub fn new(total: usize, correct: usize) -> Self {
        Self {
            total,
            correct,
            incorrect: total.saturating_sub(correct),
            accuracy_percent: accuracy_percent(correct, total),
        }
    }
}

/// The unit produced by every grouping pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub key: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: u32,
}

impl AggregateBucket {
    pub fn new(key: impl Into<String>, total: usize, correct: usize) -> Self {
        Self {
            key: key.into(),
            total,
            correct,
            accuracy: accuracy_percent(correct, total),
        }
    }

    /// Enough samples and failing accuracy: a remediation target.
    pub fn is_weak(&self) -> bool {
        self.total >= WEAK_MIN_TASKS && self.accuracy < WEAK_ACCURACY_BELOW
    }

    /// High accuracy, regardless of sample size.
    pub fn is_strong(&self) -> bool {
        self.accuracy >= STRONG_ACCURACY_FROM
    }

    pub fn incorrect(&self) -> usize {
        self.total.saturating_sub(self.correct)
    }
}

// ============================================
// Trends
// ============================================

/// Direction of a recent-vs-earlier accuracy comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    /// Not enough data points to say
    Neutral,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
            TrendDirection::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of [`compute_trend`](crate::analytics::compute_trend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Recent mean minus earlier mean, rounded
    pub percentage_points: i32,
}

impl TrendResult {
    pub fn neutral() -> Self {
        Self {
            direction: TrendDirection::Neutral,
            percentage_points: 0,
        }
    }
}

impl Default for TrendResult {
    fn default() -> Self {
        Self::neutral()
    }
}
