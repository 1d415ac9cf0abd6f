//! The composite study report.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{compute_stats, default_hour_buckets, HourBucket};
use super::location::{
    build_location_report, LocationReport, MIN_TASKS_PER_LOCATION, SIGNIFICANCE_THRESHOLD_POINTS,
};
use super::performance::{build_performance_over_time, default_period_windows, PerformanceOverTime, PeriodWindow};
use super::progress::{
    build_progress_report, default_reward_tiers, ProgressOptions, ProgressReport, RewardTier,
};
use super::sessions::{build_session_report, SessionReport};
use super::subject::{
    build_subject_reports, compare_subjects, SubjectComparison, SubjectReport, MIN_TASKS_PER_SUBJECT,
};
use super::time_of_day::{build_time_of_day_report, TimeOfDayReport, MIN_TASKS_PER_BUCKET};
use crate::config::Config;
use crate::types::{Task, TaskStats};

/// Everything [`build_study_report`] needs besides the tasks.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// "Today" for windows and streaks
    pub as_of: NaiveDate,
    pub hour_buckets: Vec<HourBucket>,
    pub period_windows: Vec<PeriodWindow>,
    pub reward_tiers: Vec<RewardTier>,
    pub min_tasks_per_day: usize,
    pub min_tasks_per_subject: usize,
    pub min_tasks_per_location: usize,
    pub location_significance_points: u32,
    pub min_tasks_per_bucket: usize,
}

impl ReportOptions {
    /// Built-in defaults.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            hour_buckets: default_hour_buckets(),
            period_windows: default_period_windows(),
            reward_tiers: default_reward_tiers(),
            min_tasks_per_day: 1,
            min_tasks_per_subject: MIN_TASKS_PER_SUBJECT,
            min_tasks_per_location: MIN_TASKS_PER_LOCATION,
            location_significance_points: SIGNIFICANCE_THRESHOLD_POINTS,
            min_tasks_per_bucket: MIN_TASKS_PER_BUCKET,
        }
    }

    pub fn from_config(config: &Config, as_of: NaiveDate) -> Self {
        let analytics = &config.analytics;
        Self {
            as_of,
            hour_buckets: analytics.hour_buckets.clone(),
            period_windows: analytics.period_windows.clone(),
            reward_tiers: config.streak_rewards.clone(),
            min_tasks_per_day: analytics.min_tasks_per_day,
            min_tasks_per_subject: MIN_TASKS_PER_SUBJECT,
            min_tasks_per_location: analytics.min_tasks_per_location,
            location_significance_points: analytics.location_significance_points,
            min_tasks_per_bucket: analytics.min_tasks_per_bucket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    pub as_of: NaiveDate,
    pub overall: TaskStats,
    pub subjects: Vec<SubjectReport>,
    pub subject_comparison: Option<SubjectComparison>,
    pub performance: PerformanceOverTime,
    pub time_of_day: TimeOfDayReport,
    pub locations: LocationReport,
    pub progress: ProgressReport,
    pub sessions: SessionReport,
}

impl StudyReport {
    pub fn is_empty(&self) -> bool {
        self.overall.total == 0
    }

    pub fn subject(&self, name: &str) -> Option<&SubjectReport> {
        self.subjects.iter().find(|s| s.subject == name)
    }
}

/// Run every view over the same task snapshot.
pub fn build_study_report(tasks: &[Task], options: &ReportOptions) -> StudyReport {
    tracing::debug!(tasks = tasks.len(), as_of = %options.as_of, "Building study report");

    StudyReport {
        as_of: options.as_of,
        overall: compute_stats(tasks),
        subjects: build_subject_reports(tasks),
        subject_comparison: compare_subjects(tasks, options.min_tasks_per_subject),
        performance: build_performance_over_time(tasks, &options.period_windows, options.as_of),
        time_of_day: build_time_of_day_report(
            tasks,
            &options.hour_buckets,
            options.min_tasks_per_bucket,
        ),
        locations: build_location_report(
            tasks,
            options.min_tasks_per_location,
            options.location_significance_points,
        ),
        progress: build_progress_report(
            tasks,
            &options.reward_tiers,
            &ProgressOptions {
                as_of: options.as_of,
                min_tasks_per_day: options.min_tasks_per_day,
            },
        ),
        sessions: build_session_report(tasks),
    }
}
