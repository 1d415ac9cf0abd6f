//! Grouping passes over canonical tasks.
//!
//! Every function here is pure: it borrows the tasks and returns a fresh
//! structure. Groupings are `BTreeMap`s so iteration order (and therefore
//! every downstream tie-break) is the ascending key order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{accuracy_percent, AggregateBucket, Task, TaskStats};

/// Tasks grouped by their single subject.
pub fn group_by_subject<'a, I>(tasks: I) -> BTreeMap<String, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: BTreeMap<String, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.subject.clone()).or_default().push(task);
    }
    groups
}

/// Tasks grouped by category.
///
/// This is a fan-out, not a partition: a task tagged `["A", "B"]` lands in
/// both groups, once each.
pub fn group_by_category_within_subject<'a, I>(tasks: I) -> BTreeMap<String, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: BTreeMap<String, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        let distinct: BTreeSet<&String> = task.categories.iter().collect();
        for category in distinct {
            groups.entry(category.clone()).or_default().push(task);
        }
    }
    groups
}

/// Correctness counts for a group of tasks.
pub fn compute_stats<'a, I>(tasks: I) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let (total, correct) = tasks
        .into_iter()
        .fold((0, 0), |(total, correct), task| {
            (total + 1, correct + usize::from(task.correct))
        });
    TaskStats::new(total, correct)
}

/// Category buckets ordered worst-first.
///
/// Ties on accuracy keep the group order, which is ascending category name.
pub fn rank_categories(groups: &BTreeMap<String, Vec<&Task>>) -> Vec<AggregateBucket> {
    let mut buckets: Vec<AggregateBucket> = groups
        .iter()
        .map(|(key, tasks)| {
            let stats = compute_stats(tasks.iter().copied());
            AggregateBucket::new(key.clone(), stats.total, stats.correct)
        })
        .collect();
    buckets.sort_by_key(|b| b.accuracy);
    buckets
}

/// Correctness counts for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy: u32,
}

impl DailyStats {
    fn new(date: NaiveDate, total: usize, correct: usize) -> Self {
        Self {
            date,
            total,
            correct,
            incorrect: total - correct,
            accuracy: accuracy_percent(correct, total),
        }
    }
}

/// Tasks bucketed by their attributed date.
pub fn group_by_date<'a, I>(tasks: I) -> BTreeMap<NaiveDate, DailyStats>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for task in tasks {
        let entry = counts.entry(task.date).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += usize::from(task.correct);
    }
    counts
        .into_iter()
        .map(|(date, (total, correct))| (date, DailyStats::new(date, total, correct)))
        .collect()
}

/// Days with activity, ascending by date.
pub fn daily_series<'a, I>(tasks: I) -> Vec<DailyStats>
where
    I: IntoIterator<Item = &'a Task>,
{
    group_by_date(tasks).into_values().collect()
}

/// A named, half-open range of hours `[start, end)`.
///
/// When `start > end` the range wraps midnight: `hour >= start || hour < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl HourBucket {
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start > self.end {
            hour >= self.start || hour < self.end
        } else {
            hour >= self.start && hour < self.end
        }
    }
}

/// Morning 6-12, afternoon 12-18, evening 18-24, night 0-6.
pub fn default_hour_buckets() -> Vec<HourBucket> {
    vec![
        HourBucket::new("morning", 6, 12),
        HourBucket::new("afternoon", 12, 18),
        HourBucket::new("evening", 18, 24),
        HourBucket::new("night", 0, 6),
    ]
}

/// Tasks bucketed by hour of day, one output bucket per definition, in
/// definition order.
///
/// A task goes to the first bucket containing its hour. Tasks with no
/// known hour, or whose hour no bucket covers, are left out of every total.
pub fn group_by_hour_bucket<'a, I>(tasks: I, buckets: &[HourBucket]) -> Vec<AggregateBucket>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts = vec![(0usize, 0usize); buckets.len()];
    for task in tasks {
        let Some(hour) = task.hour() else {
            continue;
        };
        if let Some(index) = buckets.iter().position(|b| b.contains(hour)) {
            counts[index].0 += 1;
            counts[index].1 += usize::from(task.correct);
        }
    }
    buckets
        .iter()
        .zip(counts)
        .map(|(bucket, (total, correct))| AggregateBucket::new(bucket.name.clone(), total, correct))
        .collect()
}

/// Correctness counts for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationStats {
    pub location: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub subjects_seen: BTreeSet<String>,
}

impl LocationStats {
    pub fn bucket(&self) -> AggregateBucket {
        AggregateBucket::new(self.location.clone(), self.total, self.correct)
    }
}

/// Tasks grouped by location, with the subjects studied there.
pub fn group_by_location<'a, I>(tasks: I) -> BTreeMap<String, LocationStats>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: BTreeMap<String, LocationStats> = BTreeMap::new();
    for task in tasks {
        let stats = groups
            .entry(task.location.clone())
            .or_insert_with(|| LocationStats {
                location: task.location.clone(),
                total: 0,
                correct: 0,
                accuracy: 0,
                subjects_seen: BTreeSet::new(),
            });
        stats.total += 1;
        stats.correct += usize::from(task.correct);
        stats.subjects_seen.insert(task.subject.clone());
    }
    for stats in groups.values_mut() {
        stats.accuracy = accuracy_percent(stats.correct, stats.total);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::TaskBuilder;

    #[test]
    fn test_compute_stats_basic_scenario() {
        let tasks = vec![
            TaskBuilder::new("Math").correct(true).build(),
            TaskBuilder::new("Math").correct(false).build(),
            TaskBuilder::new("Math").correct(true).build(),
        ];
        let stats = compute_stats(&tasks);
        assert_eq!(stats, TaskStats::new(3, 2));
        assert_eq!(stats.incorrect, 1);
        assert_eq!(stats.accuracy_percent, 67);
    }

    #[test]
    fn test_compute_stats_empty() {
        let stats = compute_stats(&Vec::<Task>::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.correct, 0);
        assert_eq!(stats.accuracy_percent, 0);
    }

    #[test]
    fn test_group_by_subject_partitions() {
        let tasks = vec![
            TaskBuilder::new("Math").build(),
            TaskBuilder::new("Bio").build(),
            TaskBuilder::new("Math").build(),
        ];
        let groups = group_by_subject(&tasks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Math"].len(), 2);
        assert_eq!(groups["Bio"].len(), 1);
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, tasks.len());
    }

    #[test]
    fn test_category_fan_out() {
        let tasks = vec![TaskBuilder::new("Bio")
            .categories(&["Cells", "Genetics"])
            .correct(true)
            .build()];
        let groups = group_by_category_within_subject(&tasks);
        let ranked = rank_categories(&groups);

        assert_eq!(ranked.len(), 2);
        for key in ["Cells", "Genetics"] {
            let bucket = ranked.iter().find(|b| b.key == key).unwrap();
            assert_eq!(bucket.total, 1);
            assert_eq!(bucket.correct, 1);
        }
    }

    #[test]
    fn test_category_totals_conserve_tasks() {
        let single = vec![
            TaskBuilder::new("Math").categories(&["A"]).build(),
            TaskBuilder::new("Math").categories(&["B"]).build(),
        ];
        let sum: usize = group_by_category_within_subject(&single)
            .values()
            .map(Vec::len)
            .sum();
        assert_eq!(sum, single.len());

        let multi = vec![
            TaskBuilder::new("Math").categories(&["A", "B"]).build(),
            TaskBuilder::new("Math").categories(&["B"]).build(),
        ];
        let sum: usize = group_by_category_within_subject(&multi)
            .values()
            .map(Vec::len)
            .sum();
        assert!(sum > multi.len());
    }

    #[test]
    fn test_category_keys_are_case_sensitive() {
        let tasks = vec![
            TaskBuilder::new("Math").categories(&["Algebra"]).build(),
            TaskBuilder::new("Math").categories(&["algebra"]).build(),
        ];
        assert_eq!(group_by_category_within_subject(&tasks).len(), 2);
    }

    #[test]
    fn test_rank_categories_worst_first_with_key_tie_break() {
        let tasks = vec![
            TaskBuilder::new("Math").categories(&["Zeta"]).correct(true).build(),
            TaskBuilder::new("Math").categories(&["Alpha"]).correct(true).build(),
            TaskBuilder::new("Math").categories(&["Mid"]).correct(false).build(),
        ];
        let ranked = rank_categories(&group_by_category_within_subject(&tasks));
        let keys: Vec<&str> = ranked.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_group_by_date_sorted() {
        let tasks = vec![
            TaskBuilder::new("Math").on("2024-05-03 10:00").correct(true).build(),
            TaskBuilder::new("Math").on("2024-05-01 10:00").correct(false).build(),
            TaskBuilder::new("Math").on("2024-05-03 18:00").correct(false).build(),
        ];
        let series = daily_series(&tasks);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.to_string(), "2024-05-01");
        assert_eq!(series[0].accuracy, 0);
        assert_eq!(series[1].total, 2);
        assert_eq!(series[1].incorrect, 1);
        assert_eq!(series[1].accuracy, 50);
    }

    #[test]
    fn test_hour_bucket_wraps_midnight() {
        let late = HourBucket::new("late", 22, 4);
        assert!(late.contains(23));
        assert!(late.contains(0));
        assert!(late.contains(3));
        assert!(!late.contains(4));
        assert!(!late.contains(12));

        let evening = HourBucket::new("evening", 18, 24);
        assert!(evening.contains(23));
        assert!(!evening.contains(0));
    }

    #[test]
    fn test_group_by_hour_bucket_defaults() {
        let tasks = vec![
            TaskBuilder::new("Math").on("2024-05-01 07:00").correct(true).build(),
            TaskBuilder::new("Math").on("2024-05-01 13:00").correct(false).build(),
            TaskBuilder::new("Math").on("2024-05-01 23:59").correct(true).build(),
            TaskBuilder::new("Math").on("2024-05-01 02:00").correct(true).build(),
            TaskBuilder::new("Math").undated().build(),
        ];
        let buckets = group_by_hour_bucket(&tasks, &default_hour_buckets());
        let names: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(names, vec!["morning", "afternoon", "evening", "night"]);
        assert!(buckets.iter().all(|b| b.total == 1));
        assert_eq!(buckets[1].accuracy, 0);
    }

    #[test]
    fn test_group_by_hour_bucket_drops_uncovered_hours() {
        let buckets = vec![HourBucket::new("school", 8, 15)];
        let tasks = vec![
            TaskBuilder::new("Math").on("2024-05-01 09:00").build(),
            TaskBuilder::new("Math").on("2024-05-01 20:00").build(),
        ];
        let result = group_by_hour_bucket(&tasks, &buckets);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total, 1);
    }

    #[test]
    fn test_group_by_hour_bucket_first_match_wins() {
        let buckets = vec![HourBucket::new("wide", 6, 20), HourBucket::new("narrow", 9, 10)];
        let tasks = vec![TaskBuilder::new("Math").on("2024-05-01 09:30").build()];
        let result = group_by_hour_bucket(&tasks, &buckets);
        assert_eq!(result[0].total, 1);
        assert_eq!(result[1].total, 0);
    }

    #[test]
    fn test_group_by_location_tracks_subjects() {
        let tasks = vec![
            TaskBuilder::new("Math").location("Home").correct(true).build(),
            TaskBuilder::new("Bio").location("Home").correct(false).build(),
            TaskBuilder::new("Math").location("Library").correct(true).build(),
        ];
        let groups = group_by_location(&tasks);
        let home = &groups["Home"];
        assert_eq!(home.total, 2);
        assert_eq!(home.accuracy, 50);
        assert_eq!(home.subjects_seen.len(), 2);
        assert_eq!(groups["Library"].accuracy, 100);
    }

    #[test]
    fn test_groupings_are_idempotent() {
        let tasks = vec![
            TaskBuilder::new("Math").categories(&["A", "B"]).on("2024-05-01 07:00").build(),
            TaskBuilder::new("Bio").location("Home").on("2024-05-02 19:00").correct(true).build(),
        ];
        assert_eq!(group_by_subject(&tasks), group_by_subject(&tasks));
        assert_eq!(
            rank_categories(&group_by_category_within_subject(&tasks)),
            rank_categories(&group_by_category_within_subject(&tasks))
        );
        assert_eq!(daily_series(&tasks), daily_series(&tasks));
        assert_eq!(group_by_location(&tasks), group_by_location(&tasks));
    }
}
