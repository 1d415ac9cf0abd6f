//! Progress report: weekly/monthly buckets, streak rewards and milestones.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::aggregate::{compute_stats, daily_series};
use super::streaks::{compute_streaks, daily_activity_flags};
use super::trend::{compute_trend, PROGRESS_TREND_THRESHOLD, PROGRESS_TREND_WINDOW};
use crate::types::{accuracy_percent, Task, TrendDirection, TrendResult};

/// Task-count checkpoints.
pub const TASK_COUNT_MILESTONES: [u32; 6] = [10, 25, 50, 100, 200, 500];

/// Overall accuracy checkpoints (percent).
pub const ACCURACY_MILESTONES: [u32; 6] = [50, 60, 70, 80, 90, 95];

/// Improvement (percentage points) that counts as significant.
pub const SIGNIFICANT_IMPROVEMENT_POINTS: i32 = 15;

/// A streak reward, unlocked once the current streak reaches `days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTier {
    pub days: u32,
    pub label: String,
}

impl RewardTier {
    pub fn new(days: u32, label: impl Into<String>) -> Self {
        Self {
            days,
            label: label.into(),
        }
    }
}

pub fn default_reward_tiers() -> Vec<RewardTier> {
    vec![
        RewardTier::new(3, "Warming Up"),
        RewardTier::new(7, "One Week Strong"),
        RewardTier::new(14, "Two Week Focus"),
        RewardTier::new(30, "Monthly Master"),
        RewardTier::new(60, "Unstoppable"),
        RewardTier::new(100, "Century Club"),
    ]
}

/// Tasks in one calendar week (ISO) or month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    /// `2024-W18` or `2024-05`
    pub label: String,
    /// Monday of the week, or the first of the month
    pub start: NaiveDate,
    pub total: usize,
    pub correct: usize,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementLevel {
    Significant,
    Moderate,
    Steady,
    Declining,
    InsufficientData,
}

impl ImprovementLevel {
    pub fn from_trend(trend: &TrendResult) -> Self {
        match trend.direction {
            TrendDirection::Neutral => ImprovementLevel::InsufficientData,
            TrendDirection::Stable => ImprovementLevel::Steady,
            TrendDirection::Declining => ImprovementLevel::Declining,
            TrendDirection::Improving if trend.percentage_points >= SIGNIFICANT_IMPROVEMENT_POINTS => {
                ImprovementLevel::Significant
            }
            TrendDirection::Improving => ImprovementLevel::Moderate,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImprovementLevel::Significant => "Significant improvement",
            ImprovementLevel::Moderate => "Moderate improvement",
            ImprovementLevel::Steady => "Steady",
            ImprovementLevel::Declining => "Declining",
            ImprovementLevel::InsufficientData => "Not enough data",
        }
    }
}

/// A run of active days, with dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakData {
    pub current_streak: usize,
    pub longest_streak: usize,
    /// Days meeting the activity threshold
    pub active_days: usize,
    /// Calendar days from the first task to the report date
    pub total_days: usize,
    pub streaks: Vec<StreakPeriod>,
}

impl StreakData {
    pub fn activity_percentage(&self) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            (self.active_days as f64 / self.total_days as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    TaskCount,
    Accuracy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub target: u32,
    pub current: u32,
    /// `min(100, round(100 * current / target))`
    pub progress: u32,
    pub achieved: bool,
}

impl Milestone {
    fn new(kind: MilestoneKind, target: u32, current: u32) -> Self {
        let progress = accuracy_percent(current as usize, target as usize).min(100);
        Self {
            kind,
            target,
            current,
            progress,
            achieved: current >= target,
        }
    }
}

/// Inputs of the progress report besides the tasks and reward tiers.
#[derive(Debug, Clone, Copy)]
pub struct ProgressOptions {
    /// Day the report is computed for; streaks must reach it to be current
    pub as_of: NaiveDate,
    /// Tasks a day needs to count as active
    pub min_tasks_per_day: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub weekly_buckets: Vec<PeriodBucket>,
    pub monthly_buckets: Vec<PeriodBucket>,
    pub overall_trend: TrendResult,
    pub improvement_level: ImprovementLevel,
    pub streak_data: StreakData,
    /// Tiers reached by the current streak, in the given order
    pub unlocked_rewards: Vec<RewardTier>,
    /// Lowest tier not reached yet
    pub next_reward: Option<RewardTier>,
    /// Highest progress first
    pub milestones: Vec<Milestone>,
}

/// Assemble the progress view.
pub fn build_progress_report(
    tasks: &[Task],
    reward_tiers: &[RewardTier],
    options: &ProgressOptions,
) -> ProgressReport {
    let weekly_buckets = period_buckets(tasks, |date| {
        let week = date.iso_week();
        let start = NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon)
            .unwrap_or(date);
        (format!("{:04}-W{:02}", week.year(), week.week()), start)
    });
    let monthly_buckets = period_buckets(tasks, |date| {
        let start = date.with_day(1).unwrap_or(date);
        (format!("{:04}-{:02}", date.year(), date.month()), start)
    });

    let accuracies: Vec<f64> = daily_series(tasks).iter().map(|d| d.accuracy as f64).collect();
    let overall_trend = compute_trend(
        &accuracies,
        PROGRESS_TREND_WINDOW,
        PROGRESS_TREND_WINDOW,
        PROGRESS_TREND_THRESHOLD,
    );

    let streak_data = streak_data(tasks, options);

    let unlocked_rewards: Vec<RewardTier> = reward_tiers
        .iter()
        .filter(|tier| streak_data.current_streak >= tier.days as usize)
        .cloned()
        .collect();
    let next_reward = reward_tiers
        .iter()
        .filter(|tier| streak_data.current_streak < tier.days as usize)
        .min_by_key(|tier| tier.days)
        .cloned();

    ProgressReport {
        weekly_buckets,
        monthly_buckets,
        improvement_level: ImprovementLevel::from_trend(&overall_trend),
        overall_trend,
        streak_data,
        unlocked_rewards,
        next_reward,
        milestones: milestones(tasks),
    }
}

fn period_buckets<F>(tasks: &[Task], key: F) -> Vec<PeriodBucket>
where
    F: Fn(NaiveDate) -> (String, NaiveDate),
{
    let mut groups: BTreeMap<NaiveDate, (String, Vec<&Task>)> = BTreeMap::new();
    for task in tasks {
        let (label, start) = key(task.date);
        groups
            .entry(start)
            .or_insert_with(|| (label, Vec::new()))
            .1
            .push(task);
    }
    groups
        .into_iter()
        .map(|(start, (label, group))| {
            let stats = compute_stats(group);
            PeriodBucket {
                label,
                start,
                total: stats.total,
                correct: stats.correct,
                accuracy: stats.accuracy_percent,
            }
        })
        .collect()
}

fn streak_data(tasks: &[Task], options: &ProgressOptions) -> StreakData {
    let Some(first) = tasks.iter().map(|t| t.date).min() else {
        return StreakData::default();
    };

    let days = daily_activity_flags(tasks, first, options.as_of, options.min_tasks_per_day);
    let flags: Vec<bool> = days.iter().map(|d| d.active).collect();
    let summary = compute_streaks(&flags);

    StreakData {
        current_streak: summary.current_streak,
        longest_streak: summary.longest_streak,
        active_days: flags.iter().filter(|a| **a).count(),
        total_days: days.len(),
        streaks: summary
            .runs
            .iter()
            .map(|run| StreakPeriod {
                start: days[run.start_index].date,
                end: days[run.end_index].date,
                length: run.length,
            })
            .collect(),
    }
}

fn milestones(tasks: &[Task]) -> Vec<Milestone> {
    let stats = compute_stats(tasks);
    let total = u32::try_from(stats.total).unwrap_or(u32::MAX);

    let mut milestones: Vec<Milestone> = TASK_COUNT_MILESTONES
        .iter()
        .map(|&target| Milestone::new(MilestoneKind::TaskCount, target, total))
        .chain(
            ACCURACY_MILESTONES
                .iter()
                .map(|&target| Milestone::new(MilestoneKind::Accuracy, target, stats.accuracy_percent)),
        )
        .collect();
    milestones.sort_by(|a, b| b.progress.cmp(&a.progress));
    milestones
}
