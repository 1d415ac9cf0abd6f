//! Formatting helpers shared by the renderers.

use chrono::NaiveDate;

use crate::types::{TrendDirection, TrendResult};

/// Arrow plus signed points, e.g. `↑ +12 pts`; `n/a` without enough data.
pub fn format_trend(trend: &TrendResult) -> String {
    match trend.direction {
        TrendDirection::Neutral => "n/a".to_string(),
        TrendDirection::Stable => format!("→ stable ({:+} pts)", trend.percentage_points),
        TrendDirection::Improving => format!("↑ {:+} pts", trend.percentage_points),
        TrendDirection::Declining => format!("↓ {:+} pts", trend.percentage_points),
    }
}

/// `correct/total (accuracy%)`
pub fn format_ratio(correct: usize, total: usize, accuracy: u32) -> String {
    format!("{}/{} ({}%)", correct, total, accuracy)
}

/// Text progress bar, `width` cells wide.
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Duration as `45m` or `1h 05m`.
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}

/// Short date (`May 01`), or `-` if missing.
pub fn format_date_opt(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%b %d").to_string(),
        None => "-".to_string(),
    }
}

/// `1 day`, `3 days`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
