//! Performance over time: daily series, period trends and smoothing.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::aggregate::{daily_series, DailyStats};
use super::trend::{
    compute_trend, consistency_score, mean, rolling_average, DEFAULT_TREND_WINDOW,
    SUBJECT_TREND_THRESHOLD,
};
use crate::types::{Task, TrendResult};

/// Window sizes (in days of activity) for the smoothed accuracy lines.
pub const DEFAULT_ROLLING_WINDOWS: [usize; 2] = [3, 7];

/// A named trailing window. `days: None` means the entire history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub name: String,
    #[serde(default)]
    pub days: Option<u32>,
}

impl PeriodWindow {
    pub fn new(name: impl Into<String>, days: Option<u32>) -> Self {
        Self {
            name: name.into(),
            days,
        }
    }

    /// Whether `date` falls in this window when looking back from `as_of`.
    ///
    /// A window reaching past the earliest representable date covers the
    /// whole history up to `as_of`.
    pub fn contains(&self, date: NaiveDate, as_of: NaiveDate) -> bool {
        let Some(days) = self.days else {
            return true;
        };
        match as_of.checked_sub_days(Days::new(u64::from(days))) {
            Some(start) => date <= as_of && date > start,
            None => date <= as_of,
        }
    }
}

/// Last 7 days, last 30 days, everything.
pub fn default_period_windows() -> Vec<PeriodWindow> {
    vec![
        PeriodWindow::new("week", Some(7)),
        PeriodWindow::new("month", Some(30)),
        PeriodWindow::new("all", None),
    ]
}

/// Trend for one period window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTrend {
    pub period: String,
    pub days: Option<u32>,
    /// Active days inside the window
    pub active_days: usize,
    pub trend: TrendResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceOverTime {
    /// Active days, ascending
    pub daily_series: Vec<DailyStats>,
    /// In the order the windows were given
    pub trends_by_period: Vec<PeriodTrend>,
    /// Window size -> smoothed daily accuracy, aligned with `daily_series`
    pub rolling_averages: BTreeMap<usize, Vec<f64>>,
    /// Mean of the daily accuracies, rounded
    pub average_accuracy: u32,
    pub best_day: Option<DailyStats>,
    pub worst_day: Option<DailyStats>,
    pub consistency_score: u32,
}

/// Assemble the performance-over-time view.
///
/// Period windows look back from `as_of`. Best and worst day ties go to
/// the earliest date.
pub fn build_performance_over_time(
    tasks: &[Task],
    period_windows: &[PeriodWindow],
    as_of: NaiveDate,
) -> PerformanceOverTime {
    let series = daily_series(tasks);
    let accuracies: Vec<f64> = series.iter().map(|d| d.accuracy as f64).collect();

    let trends_by_period = period_windows
        .iter()
        .map(|window| {
            let in_window: Vec<f64> = series
                .iter()
                .filter(|d| window.contains(d.date, as_of))
                .map(|d| d.accuracy as f64)
                .collect();
            PeriodTrend {
                period: window.name.clone(),
                days: window.days,
                active_days: in_window.len(),
                trend: compute_trend(
                    &in_window,
                    DEFAULT_TREND_WINDOW,
                    DEFAULT_TREND_WINDOW,
                    SUBJECT_TREND_THRESHOLD,
                ),
            }
        })
        .collect();

    let mut best_day: Option<&DailyStats> = None;
    let mut worst_day: Option<&DailyStats> = None;
    for day in &series {
        if best_day.map_or(true, |best| day.accuracy > best.accuracy) {
            best_day = Some(day);
        }
        if worst_day.map_or(true, |worst| day.accuracy < worst.accuracy) {
            worst_day = Some(day);
        }
    }

    PerformanceOverTime {
        trends_by_period,
        rolling_averages: rolling_average(&accuracies, &DEFAULT_ROLLING_WINDOWS),
        average_accuracy: mean(&accuracies).round() as u32,
        best_day: best_day.cloned(),
        worst_day: worst_day.cloned(),
        consistency_score: consistency_score(&accuracies),
        daily_series: series,
    }
}
