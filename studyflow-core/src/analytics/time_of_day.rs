//! Time-of-day report: which part of the day goes best.

use serde::Serialize;

use super::aggregate::{group_by_hour_bucket, HourBucket};
use crate::types::{AggregateBucket, Task};

/// Buckets with fewer tasks than this are never ranked.
pub const MIN_TASKS_PER_BUCKET: usize = 3;

/// Structured advice; phrasing is left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Schedule demanding material in this bucket
    FocusOn { bucket: String, accuracy: u32 },
    /// Prefer review over new material in this bucket
    AvoidHardMaterial { bucket: String, accuracy: u32 },
    /// No bucket has enough tasks yet
    CollectMoreData { min_tasks: usize },
}

impl Recommendation {
    /// Default English phrasing.
    pub fn message(&self) -> String {
        match self {
            Recommendation::FocusOn { bucket, accuracy } => format!(
                "You do best in the {} ({}% correct). Schedule your hardest material then.",
                bucket, accuracy
            ),
            Recommendation::AvoidHardMaterial { bucket, accuracy } => format!(
                "Accuracy drops in the {} ({}% correct). Use that time for review.",
                bucket, accuracy
            ),
            Recommendation::CollectMoreData { min_tasks } => format!(
                "Log at least {} tasks in a part of the day to get recommendations.",
                min_tasks
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeOfDayReport {
    /// One entry per bucket definition, in definition order
    pub per_bucket: Vec<AggregateBucket>,
    pub best_bucket: Option<AggregateBucket>,
    pub worst_bucket: Option<AggregateBucket>,
    pub recommendations: Vec<Recommendation>,
}

/// Rank time-of-day buckets among those with at least `min_tasks` tasks.
///
/// Ties go to the bucket defined first. As in the location and subject
/// views, a single qualifying bucket is both best and worst; only a focus
/// recommendation is made then.
pub fn build_time_of_day_report(
    tasks: &[Task],
    bucket_defs: &[HourBucket],
    min_tasks: usize,
) -> TimeOfDayReport {
    let per_bucket = group_by_hour_bucket(tasks, bucket_defs);

    let mut best: Option<&AggregateBucket> = None;
    let mut worst: Option<&AggregateBucket> = None;
    for bucket in per_bucket.iter().filter(|b| b.total >= min_tasks.max(1)) {
        if best.map_or(true, |b| bucket.accuracy > b.accuracy) {
            best = Some(bucket);
        }
        if worst.map_or(true, |w| bucket.accuracy < w.accuracy) {
            worst = Some(bucket);
        }
    }

    let mut recommendations = Vec::new();
    match (best, worst) {
        (Some(best), Some(worst)) => {
            recommendations.push(Recommendation::FocusOn {
                bucket: best.key.clone(),
                accuracy: best.accuracy,
            });
            if worst.key != best.key && worst.accuracy < best.accuracy {
                recommendations.push(Recommendation::AvoidHardMaterial {
                    bucket: worst.key.clone(),
                    accuracy: worst.accuracy,
                });
            }
        }
        _ => recommendations.push(Recommendation::CollectMoreData {
            min_tasks: min_tasks.max(1),
        }),
    }

    TimeOfDayReport {
        best_bucket: best.cloned(),
        worst_bucket: worst.cloned(),
        per_bucket,
        recommendations,
    }
}
