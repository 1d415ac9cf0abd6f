//! Streaks: runs of consecutive active days.
//!
//! Not to be confused with [`consistency_score`](super::consistency_score),
//! which measures how much accuracy varies from day to day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Task;

/// A maximal run of `true` values, indices inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakRun {
    pub start_index: usize,
    pub end_index: usize,
    pub length: usize,
}

/// All runs in an activity series plus the headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub runs: Vec<StreakRun>,
    /// Length of the trailing run (0 if the last day was inactive)
    pub current_streak: usize,
    pub longest_streak: usize,
}

/// Find every run of active days in a chronological series.
pub fn compute_streaks(daily_activity: &[bool]) -> StreakSummary {
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;

    for (index, &active) in daily_activity.iter().enumerate() {
        match (active, run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                runs.push(StreakRun {
                    start_index: start,
                    end_index: index - 1,
                    length: index - start,
                });
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(StreakRun {
            start_index: start,
            end_index: daily_activity.len() - 1,
            length: daily_activity.len() - start,
        });
    }

    let current_streak = match runs.last() {
        Some(run) if run.end_index + 1 == daily_activity.len() => run.length,
        _ => 0,
    };
    let longest_streak = runs.iter().map(|r| r.length).max().unwrap_or(0);

    StreakSummary {
        runs,
        current_streak,
        longest_streak,
    }
}

/// Activity on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub tasks: usize,
    pub active: bool,
}

/// One entry per calendar day in `from..=to`, gaps included.
///
/// A day is active when it has at least `min_tasks` tasks. An empty range
/// (`from > to`) yields no days.
pub fn daily_activity_flags<'a, I>(
    tasks: I,
    from: NaiveDate,
    to: NaiveDate,
    min_tasks: usize,
) -> Vec<DayActivity>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for task in tasks {
        if task.date >= from && task.date <= to {
            *per_day.entry(task.date).or_insert(0) += 1;
        }
    }

    from.iter_days()
        .take_while(|day| *day <= to)
        .map(|date| {
            let count = per_day.get(&date).copied().unwrap_or(0);
            DayActivity {
                date,
                tasks: count,
                active: count >= min_tasks.max(1),
            }
        })
        .collect()
}
