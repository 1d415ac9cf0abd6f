//! Trend detection and series smoothing.

use std::collections::BTreeMap;

use crate::types::{TrendDirection, TrendResult};

/// Stable band (percentage points) for subject-level trends.
pub const SUBJECT_TREND_THRESHOLD: i32 = 10;

/// Stable band (percentage points) for the overall progress trend.
pub const PROGRESS_TREND_THRESHOLD: i32 = 5;

/// Default window length for trend comparisons.
pub const DEFAULT_TREND_WINDOW: usize = 7;

/// Window length for the overall progress trend.
pub const PROGRESS_TREND_WINDOW: usize = 5;

/// Fewer points than this always yield a neutral trend.
pub const MIN_TREND_POINTS: usize = 3;

/// Compare the mean of the most recent window with the window before it.
///
/// `series` must be in chronological order. With fewer points than the two
/// windows need, the series is split in half instead (the recent half gets
/// the extra point). A rounded difference within `±stable_threshold` is
/// [`TrendDirection::Stable`].
pub fn compute_trend(
    series: &[f64],
    recent_window: usize,
    earlier_window: usize,
    stable_threshold: i32,
) -> TrendResult {
    let n = series.len();
    if n < MIN_TREND_POINTS || recent_window == 0 || earlier_window == 0 {
        return TrendResult::neutral();
    }

    let recent_len = recent_window.min(n - n / 2);
    let earlier_len = earlier_window.min(n - recent_len);

    let recent = &series[n - recent_len..];
    let earlier = &series[n - recent_len - earlier_len..n - recent_len];

    let diff = (mean(recent) - mean(earlier)).round() as i32;
    let direction = if diff.abs() <= stable_threshold {
        TrendDirection::Stable
    } else if diff > 0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    };

    TrendResult {
        direction,
        percentage_points: diff,
    }
}

/// Trailing averages for each window size.
///
/// Position `i` of each output averages `series[i + 1 - w ..= i]`, using
/// fewer points near the start. A window of 0 is treated as 1.
pub fn rolling_average(series: &[f64], window_sizes: &[usize]) -> BTreeMap<usize, Vec<f64>> {
    window_sizes
        .iter()
        .map(|&size| {
            let window = size.max(1);
            let averages = (0..series.len())
                .map(|i| {
                    let start = (i + 1).saturating_sub(window);
                    mean(&series[start..=i])
                })
                .collect();
            (size, averages)
        })
        .collect()
}

/// Day-to-day steadiness of accuracy: `100 - round(stddev)`, floored at 0.
///
/// Uses the population standard deviation. No days scores 0; one day
/// scores 100. This is about variance only, see
/// [`compute_streaks`](super::compute_streaks) for consecutive activity.
pub fn consistency_score(daily_accuracies: &[f64]) -> u32 {
    if daily_accuracies.is_empty() {
        return 0;
    }
    let avg = mean(daily_accuracies);
    let variance = daily_accuracies
        .iter()
        .map(|v| (v - avg).powi(2))
        .sum::<f64>()
        / daily_accuracies.len() as f64;
    let penalty = variance.sqrt().round();
    (100.0 - penalty).max(0.0) as u32
}

/// Arithmetic mean, 0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
