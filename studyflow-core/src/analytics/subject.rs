//! Per-subject breakdown with weak and strong categories.

use serde::Serialize;

use super::aggregate::{
    compute_stats, daily_series, group_by_category_within_subject, group_by_subject,
    rank_categories,
};
use super::trend::{compute_trend, DEFAULT_TREND_WINDOW, SUBJECT_TREND_THRESHOLD};
use crate::types::{AggregateBucket, Task, TaskStats, TrendResult};

/// Minimum tasks for a subject to take part in [`compare_subjects`].
pub const MIN_TASKS_PER_SUBJECT: usize = 3;

/// Everything the subject view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReport {
    pub subject: String,
    pub stats: TaskStats,
    /// Worst-first
    pub category_performance: Vec<AggregateBucket>,
    pub weak_categories: Vec<AggregateBucket>,
    pub strong_categories: Vec<AggregateBucket>,
    /// Over the subject's daily accuracies
    pub trend: TrendResult,
}

/// Build the report for one subject. Tasks from other subjects are skipped,
/// so the full task list can be passed in.
pub fn build_subject_report<'a, I>(subject: &str, tasks: I) -> SubjectReport
where
    I: IntoIterator<Item = &'a Task>,
    I::IntoIter: Clone,
{
    let tasks = tasks.into_iter().filter(move |t| t.subject == subject);
    let stats = compute_stats(tasks.clone());
    let category_performance = rank_categories(&group_by_category_within_subject(tasks.clone()));

    let weak_categories = category_performance
        .iter()
        .filter(|b| b.is_weak())
        .cloned()
        .collect();
    let strong_categories = category_performance
        .iter()
        .filter(|b| b.is_strong())
        .cloned()
        .collect();

    let accuracies: Vec<f64> = daily_series(tasks).iter().map(|d| d.accuracy as f64).collect();
    let trend = compute_trend(
        &accuracies,
        DEFAULT_TREND_WINDOW,
        DEFAULT_TREND_WINDOW,
        SUBJECT_TREND_THRESHOLD,
    );

    SubjectReport {
        subject: subject.to_string(),
        stats,
        category_performance,
        weak_categories,
        strong_categories,
        trend,
    }
}

/// One report per subject, ordered by subject name.
pub fn build_subject_reports(tasks: &[Task]) -> Vec<SubjectReport> {
    group_by_subject(tasks)
        .iter()
        .map(|(subject, group)| build_subject_report(subject, group.iter().copied()))
        .collect()
}

/// Strongest and weakest subject among sufficiently sampled ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectComparison {
    pub strongest: AggregateBucket,
    pub weakest: AggregateBucket,
    /// All qualifying subjects, best first
    pub ranked: Vec<AggregateBucket>,
}

/// Rank subjects with at least `min_tasks` tasks.
///
/// Follows the same sample guard as the location and time-of-day views:
/// `None` when no subject qualifies, and a single qualifying subject is
/// both strongest and weakest. Ties keep subject name order.
pub fn compare_subjects(tasks: &[Task], min_tasks: usize) -> Option<SubjectComparison> {
    let mut ranked: Vec<AggregateBucket> = group_by_subject(tasks)
        .iter()
        .map(|(subject, group)| {
            let stats = compute_stats(group.iter().copied());
            AggregateBucket::new(subject.clone(), stats.total, stats.correct)
        })
        .filter(|b| b.total >= min_tasks)
        .collect();

    ranked.sort_by(|a, b| b.accuracy.cmp(&a.accuracy));
    let strongest = ranked.first()?.clone();
    let weakest = ranked.iter().min_by_key(|b| b.accuracy)?.clone();

    Some(SubjectComparison {
        strongest,
        weakest,
        ranked,
    })
}
