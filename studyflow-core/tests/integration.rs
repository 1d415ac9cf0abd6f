//! Integration tests for the load -> normalize -> report pipeline
//!
//! These tests use the exports in `tests/fixtures/` and a fixed processing
//! time so every derived number is pinned.

use chrono::{NaiveDate, NaiveDateTime};
use studyflow_core::analytics::{
    build_study_report, compute_stats, compute_streaks, compute_trend, group_by_category_within_subject,
    group_by_subject, ImprovementLevel, Recommendation, ReportOptions, StudyReport,
    SUBJECT_TREND_THRESHOLD,
};
use studyflow_core::source::load_rows;
use studyflow_core::{AggregateBucket, Task, TaskNormalizer, TrendDirection, UNKNOWN_LABEL};
use std::path::PathBuf;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn processing_time() -> NaiveDateTime {
    date("2024-05-10").and_hms_opt(12, 0, 0).unwrap()
}

fn load_tasks(name: &str) -> Vec<Task> {
    studyflow_core::logging::init_test();
    let rows = load_rows(&fixture_path(name)).expect("fixture should load");
    TaskNormalizer::at(processing_time()).normalize(&rows)
}

fn report() -> StudyReport {
    let tasks = load_tasks("study_tasks.json");
    build_study_report(&tasks, &ReportOptions::new(date("2024-05-10")))
}

fn find<'a>(buckets: &'a [AggregateBucket], key: &str) -> &'a AggregateBucket {
    buckets
        .iter()
        .find(|b| b.key == key)
        .unwrap_or_else(|| panic!("missing bucket {key}"))
}

// ============================================
// Loading and normalization
// ============================================

#[test]
fn test_json_fixture_normalizes_every_object_row() {
    let tasks = load_tasks("study_tasks.json");
    assert_eq!(tasks.len(), 11);

    let mitosis = tasks.iter().find(|t| t.id == "t7").unwrap();
    assert_eq!(mitosis.subject, "Biologia");
    assert_eq!(mitosis.categories, vec!["Komórki"]);
    assert!(mitosis.correct);

    let meiosis = tasks.iter().find(|t| t.id == "t8").unwrap();
    assert_eq!(meiosis.location, "W szkole");
    assert_eq!(meiosis.date, date("2024-05-09"));
    assert!(meiosis.start_time.is_none());
    assert_eq!(meiosis.hour(), Some(19));

    let orphan = &tasks[10];
    assert_eq!(orphan.id, "row-11");
    assert_eq!(orphan.categories, vec![UNKNOWN_LABEL]);
    assert!(orphan.date_inferred);
    assert_eq!(orphan.date, date("2024-05-10"));
    assert!(!orphan.correct);
}

#[test]
fn test_csv_fixture_normalizes() {
    let tasks = load_tasks("study_tasks.csv");
    assert_eq!(tasks.len(), 3);

    assert_eq!(tasks[0].categories, vec!["Algebra", "Funkcje"]);
    assert_eq!(tasks[0].session_id.as_deref(), Some("s1"));
    assert_eq!(tasks[1].location, "W szkole");
    assert!(!tasks[1].correct);
    assert_eq!(tasks[2].categories, vec![UNKNOWN_LABEL]);
    assert_eq!(tasks[2].location, "Dom");
    assert!(tasks[2].correct);
    assert!(tasks.iter().all(|t| !t.date_inferred));

    let report = build_study_report(&tasks, &ReportOptions::new(date("2024-05-02")));
    assert_eq!(report.sessions.sessions.len(), 1);
    assert_eq!(report.sessions.sessions[0].duration_minutes, Some(40));
}

#[test]
fn test_normalization_is_idempotent() {
    assert_eq!(load_tasks("study_tasks.json"), load_tasks("study_tasks.json"));
}

// ============================================
// Report over the JSON fixture
// ============================================

#[test]
fn test_overall_and_subject_stats() {
    let report = report();
    assert_eq!(report.overall.total, 11);
    assert_eq!(report.overall.correct, 6);
    assert_eq!(report.overall.accuracy_percent, 55);

    let math = report.subject("Matematyka").unwrap();
    assert_eq!(math.stats.total, 6);
    assert_eq!(math.stats.accuracy_percent, 50);

    let weak: Vec<&str> = math.weak_categories.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(weak, vec!["Trygonometria"]);
    let strong: Vec<&str> = math.strong_categories.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(strong, vec!["Funkcje"]);

    let bio = report.subject("Biologia").unwrap();
    // two tasks only, so never weak
    let genetics = find(&bio.category_performance, "Genetyka");
    assert_eq!(genetics.accuracy, 50);
    assert!(!genetics.is_weak());

    let comparison = report.subject_comparison.as_ref().unwrap();
    assert_eq!(comparison.strongest.key, "Biologia");
    assert_eq!(comparison.weakest.key, "Matematyka");
    assert_eq!(comparison.ranked.len(), 2);
}

#[test]
fn test_time_of_day_and_locations() {
    let report = report();

    let time_of_day = &report.time_of_day;
    assert_eq!(find(&time_of_day.per_bucket, "morning").total, 4);
    assert_eq!(find(&time_of_day.per_bucket, "morning").accuracy, 75);
    assert_eq!(find(&time_of_day.per_bucket, "evening").total, 3);
    assert_eq!(find(&time_of_day.per_bucket, "night").total, 0);
    assert_eq!(
        time_of_day.recommendations,
        vec![
            Recommendation::FocusOn {
                bucket: "morning".into(),
                accuracy: 75
            },
            Recommendation::AvoidHardMaterial {
                bucket: "afternoon".into(),
                accuracy: 33
            },
        ]
    );

    let locations = &report.locations;
    assert_eq!(locations.per_location.len(), 4);
    assert_eq!(locations.best.as_ref().unwrap().location, "Dom");
    assert_eq!(locations.worst.as_ref().unwrap().location, "Biblioteka");
    assert_eq!(locations.significant_pairwise_differences.len(), 1);
    assert_eq!(locations.significant_pairwise_differences[0].difference, 34);
}

#[test]
fn test_performance_progress_and_sessions() {
    let report = report();

    let accuracies: Vec<u32> = report
        .performance
        .daily_series
        .iter()
        .map(|d| d.accuracy)
        .collect();
    assert_eq!(accuracies, vec![50, 50, 67, 50, 50]);
    assert_eq!(report.performance.best_day.as_ref().unwrap().date, date("2024-05-08"));
    assert_eq!(report.performance.worst_day.as_ref().unwrap().date, date("2024-05-06"));

    let progress = &report.progress;
    assert_eq!(progress.streak_data.current_streak, 5);
    assert_eq!(progress.streak_data.longest_streak, 5);
    assert_eq!(progress.unlocked_rewards.len(), 1);
    assert_eq!(progress.next_reward.as_ref().unwrap().days, 7);
    assert_eq!(progress.overall_trend.direction, TrendDirection::Improving);
    assert_eq!(progress.overall_trend.percentage_points, 6);
    assert_eq!(progress.improvement_level, ImprovementLevel::Moderate);
    assert_eq!(progress.monthly_buckets.len(), 1);

    let sessions = &report.sessions;
    assert_eq!(sessions.sessions.len(), 1);
    assert_eq!(sessions.sessions[0].session_id, "s1");
    assert_eq!(sessions.sessions[0].duration_minutes, Some(45));
}

#[test]
fn test_report_serializes_to_json() {
    let json = serde_json::to_value(report()).unwrap();
    assert_eq!(json["overall"]["total"], 11);
    assert_eq!(json["progress"]["improvement_level"], "moderate");
    assert_eq!(json["time_of_day"]["recommendations"][0]["kind"], "focus_on");
}

// ============================================
// Properties
// ============================================

#[test]
fn test_aggregation_is_idempotent() {
    let tasks = load_tasks("study_tasks.json");
    let options = ReportOptions::new(date("2024-05-10"));
    assert_eq!(build_study_report(&tasks, &options), build_study_report(&tasks, &options));
}

#[test]
fn test_accuracy_bounds() {
    let report = report();
    let buckets = report
        .subjects
        .iter()
        .flat_map(|s| s.category_performance.iter())
        .chain(report.time_of_day.per_bucket.iter());
    for bucket in buckets {
        assert!(bucket.accuracy <= 100);
        if bucket.total == 0 {
            assert_eq!(bucket.accuracy, 0);
        }
    }
}

#[test]
fn test_category_fan_out_conservation() {
    let tasks = load_tasks("study_tasks.json");
    for (subject, group) in group_by_subject(&tasks) {
        let per_category = group_by_category_within_subject(group.iter().copied());
        let fanned: usize = per_category.values().map(Vec::len).sum();
        let single_category = group.iter().all(|t| t.categories.len() == 1);

        assert!(fanned >= group.len(), "{subject}");
        assert_eq!(fanned == group.len(), single_category, "{subject}");
    }
}

#[test]
fn test_weak_and_strong_are_disjoint() {
    for total in 0..12 {
        for correct in 0..=total {
            let bucket = AggregateBucket::new("x", total, correct);
            assert!(!(bucket.is_weak() && bucket.is_strong()));
        }
    }
}

#[test]
fn test_streak_monotonicity() {
    let mut days = vec![true, false, true, true];
    let before = compute_streaks(&days).current_streak;
    assert_eq!(before, 2);

    days.push(true);
    assert_eq!(compute_streaks(&days).current_streak, before + 1);

    days.push(false);
    assert_eq!(compute_streaks(&days).current_streak, 0);
}

#[test]
fn test_short_series_trend_is_neutral() {
    let trend = compute_trend(&[0.0, 100.0], 7, 7, SUBJECT_TREND_THRESHOLD);
    assert_eq!(trend.direction, TrendDirection::Neutral);
    assert_eq!(trend.percentage_points, 0);
}

#[test]
fn test_empty_input_is_neutral() {
    let report = build_study_report(&[], &ReportOptions::new(date("2024-05-10")));
    assert!(report.is_empty());
    assert_eq!(compute_stats(&Vec::<Task>::new()).accuracy_percent, 0);
    assert_eq!(report.progress.overall_trend.direction, TrendDirection::Neutral);
    assert!(report.locations.best.is_none());
}
