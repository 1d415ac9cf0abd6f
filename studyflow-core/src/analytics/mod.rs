//! Analytics module for StudyFlow
//!
//! Provides aggregate statistics and report views including:
//! - Grouping and correctness counts (subject, category, day, hour, location)
//! - Trends, rolling averages and the consistency score
//! - Activity streaks
//! - Subject, performance, time-of-day, location, progress and session reports
//!
//! ## Purity
//!
//! Every function borrows a task snapshot and returns a fresh result tree.
//! Nothing is cached; callers re-run the views whenever the task list
//! changes. Views that depend on "today" take an explicit `as_of` date.
//!
//! See [`build_study_report`] for the composite view the CLI renders.

pub mod aggregate;
pub mod location;
pub mod performance;
pub mod progress;
pub mod report;
pub mod sessions;
pub mod streaks;
pub mod subject;
pub mod time_of_day;
pub mod trend;

// Aggregator exports
pub use aggregate::{
    compute_stats, daily_series, default_hour_buckets, group_by_category_within_subject,
    group_by_date, group_by_hour_bucket, group_by_location, group_by_subject, rank_categories,
    DailyStats, HourBucket, LocationStats,
};
pub use sessions::{build_session_report, group_by_session, SessionReport, SessionSummary};
pub use streaks::{compute_streaks, daily_activity_flags, DayActivity, StreakRun, StreakSummary};
pub use trend::{
    compute_trend, consistency_score, rolling_average, PROGRESS_TREND_THRESHOLD,
    SUBJECT_TREND_THRESHOLD,
};

// Report exports
pub use location::{build_location_report, LocationComparison, LocationReport};
pub use performance::{
    build_performance_over_time, default_period_windows, PerformanceOverTime, PeriodTrend,
    PeriodWindow,
};
pub use progress::{
    build_progress_report, default_reward_tiers, ImprovementLevel, Milestone, MilestoneKind,
    PeriodBucket, ProgressOptions, ProgressReport, RewardTier, StreakData, StreakPeriod,
};
pub use report::{build_study_report, ReportOptions, StudyReport};
pub use subject::{
    build_subject_report, build_subject_reports, compare_subjects, SubjectComparison,
    SubjectReport,
};
pub use time_of_day::{build_time_of_day_report, Recommendation, TimeOfDayReport};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{NaiveDate, NaiveDateTime};

    use crate::types::{Task, UNSPECIFIED_LOCATION};

    static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

    pub fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn datetime(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
    }

    /// Canonical tasks for tests. Dated 2024-05-01 with no times by default.
    pub struct TaskBuilder {
        task: Task,
    }

    impl TaskBuilder {
        pub fn new(subject: &str) -> Self {
            let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
            Self {
                task: Task {
                    id: format!("task-{}", id),
                    name: format!("Task {}", id),
                    subject: subject.to_string(),
                    categories: vec!["General".to_string()],
                    correct: false,
                    start_time: None,
                    end_time: None,
                    recorded_at: None,
                    date: date("2024-05-01"),
                    date_inferred: false,
                    location: UNSPECIFIED_LOCATION.to_string(),
                    session_id: None,
                },
            }
        }

        pub fn categories(mut self, categories: &[&str]) -> Self {
            self.task.categories = categories.iter().map(|c| c.to_string()).collect();
            self
        }

        pub fn correct(mut self, correct: bool) -> Self {
            self.task.correct = correct;
            self
        }

        /// Start time `YYYY-MM-DD HH:MM`; also sets the date.
        pub fn on(mut self, at: &str) -> Self {
            let start = datetime(at);
            self.task.start_time = Some(start);
            self.task.date = start.date();
            self
        }

        pub fn ended(mut self, at: &str) -> Self {
            self.task.end_time = Some(datetime(at));
            self
        }

        /// No start time or row timestamp, so no hour of day.
        pub fn undated(mut self) -> Self {
            self.task.start_time = None;
            self.task.recorded_at = None;
            self
        }

        pub fn location(mut self, location: &str) -> Self {
            self.task.location = location.to_string();
            self
        }

        pub fn session(mut self, session_id: &str) -> Self {
            self.task.session_id = Some(session_id.to_string());
            self
        }

        pub fn build(self) -> Task {
            self.task
        }
    }
}
