//! Location report: does where you study matter?

use serde::Serialize;

use super::aggregate::{group_by_location, LocationStats};
use crate::types::Task;

/// Default sample floor for a location to be compared.
pub const MIN_TASKS_PER_LOCATION: usize = 3;

/// Default accuracy gap (percentage points) considered significant.
pub const SIGNIFICANCE_THRESHOLD_POINTS: u32 = 10;

/// A pair of locations whose accuracy differs meaningfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationComparison {
    pub better: String,
    pub better_accuracy: u32,
    pub worse: String,
    pub worse_accuracy: u32,
    pub difference: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationReport {
    /// Every location, ascending by name
    pub per_location: Vec<LocationStats>,
    pub best: Option<LocationStats>,
    pub worst: Option<LocationStats>,
    /// Largest difference first
    pub significant_pairwise_differences: Vec<LocationComparison>,
}

/// Compare locations with at least `min_tasks_per_location` tasks.
///
/// Best and worst are `None` when no location qualifies, and a single
/// qualifying location is both; subject comparison and the time-of-day
/// view follow the same guard. Pairs need two qualifying locations. Ties
/// go to the alphabetically first location, pairs are enumerated in name
/// order and the sort by difference is stable.
pub fn build_location_report(
    tasks: &[Task],
    min_tasks_per_location: usize,
    significance_threshold_points: u32,
) -> LocationReport {
    let per_location: Vec<LocationStats> = group_by_location(tasks).into_values().collect();
    let qualifying: Vec<&LocationStats> = per_location
        .iter()
        .filter(|l| l.total >= min_tasks_per_location.max(1))
        .collect();

    let mut best: Option<&LocationStats> = None;
    let mut worst: Option<&LocationStats> = None;
    for &location in &qualifying {
        if best.map_or(true, |b| location.accuracy > b.accuracy) {
            best = Some(location);
        }
        if worst.map_or(true, |w| location.accuracy < w.accuracy) {
            worst = Some(location);
        }
    }

    let mut significant = Vec::new();
    for (i, a) in qualifying.iter().enumerate() {
        for b in &qualifying[i + 1..] {
            let difference = a.accuracy.abs_diff(b.accuracy);
            if difference < significance_threshold_points {
                continue;
            }
            let (better, worse) = if a.accuracy >= b.accuracy { (a, b) } else { (b, a) };
            significant.push(LocationComparison {
                better: better.location.clone(),
                better_accuracy: better.accuracy,
                worse: worse.location.clone(),
                worse_accuracy: worse.accuracy,
                difference,
            });
        }
    }
    significant.sort_by(|x, y| y.difference.cmp(&x.difference));

    LocationReport {
        best: best.cloned(),
        worst: worst.cloned(),
        per_location,
        significant_pairwise_differences: significant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::TaskBuilder;

    fn at(location: &str, total: usize, correct: usize) -> Vec<Task> {
        (0..total)
            .map(|i| TaskBuilder::new("Math").location(location).correct(i < correct).build())
            .collect()
    }

    #[test]
    fn test_location_significance_scenario() {
        let mut tasks = at("A", 10, 8);
        tasks.extend(at("B", 5, 3));

        let report = build_location_report(&tasks, MIN_TASKS_PER_LOCATION, SIGNIFICANCE_THRESHOLD_POINTS);
        assert_eq!(report.per_location.len(), 2);
        assert_eq!(
            report.significant_pairwise_differences,
            vec![LocationComparison {
                better: "A".into(),
                better_accuracy: 80,
                worse: "B".into(),
                worse_accuracy: 60,
                difference: 20,
            }]
        );
        assert_eq!(report.best.unwrap().location, "A");
        assert_eq!(report.worst.unwrap().location, "B");
    }

    #[test]
    fn test_small_locations_are_excluded() {
        let mut tasks = at("Home", 4, 4);
        tasks.extend(at("Bus", 2, 0));

        let report = build_location_report(&tasks, MIN_TASKS_PER_LOCATION, SIGNIFICANCE_THRESHOLD_POINTS);
        assert_eq!(report.per_location.len(), 2);
        assert!(report.significant_pairwise_differences.is_empty());
        assert_eq!(report.best.as_ref().unwrap().location, "Home");
        assert_eq!(report.worst.as_ref().unwrap().location, "Home");
    }

    #[test]
    fn test_no_qualifying_location() {
        let mut tasks = at("Home", 2, 2);
        tasks.extend(at("Bus", 2, 0));

        let report = build_location_report(&tasks, MIN_TASKS_PER_LOCATION, SIGNIFICANCE_THRESHOLD_POINTS);
        assert_eq!(report.per_location.len(), 2);
        assert!(report.best.is_none());
        assert!(report.worst.is_none());
        assert!(report.significant_pairwise_differences.is_empty());
    }

    #[test]
    fn test_pairs_sorted_by_difference() {
        let mut tasks = at("Home", 4, 4); // 100
        tasks.extend(at("Library", 4, 3)); // 75
        tasks.extend(at("School", 4, 1)); // 25

        let report = build_location_report(&tasks, 3, 10);
        let diffs: Vec<u32> = report
            .significant_pairwise_differences
            .iter()
            .map(|c| c.difference)
            .collect();
        assert_eq!(diffs, vec![75, 50, 25]);
        assert_eq!(report.significant_pairwise_differences[1].better, "Library");
    }

    #[test]
    fn test_below_threshold_not_reported() {
        let mut tasks = at("Home", 10, 8);
        tasks.extend(at("Library", 10, 9));
        let report = build_location_report(&tasks, 3, 10);
        assert_eq!(report.significant_pairwise_differences.len(), 1);

        let report = build_location_report(&tasks, 3, 11);
        assert!(report.significant_pairwise_differences.is_empty());
    }

    #[test]
    fn test_empty_tasks() {
        let report = build_location_report(&[], 3, 10);
        assert!(report.per_location.is_empty());
        assert!(report.best.is_none());
        assert!(report.worst.is_none());
    }
}
