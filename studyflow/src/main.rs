//! studyflow-report - study task analytics in the terminal
//!
//! Loads study task rows from a spreadsheet export or the Apps Script
//! endpoint and prints the full study report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Parser, ValueEnum};
use studyflow_core::analytics::{
    build_study_report, ReportOptions, StudyReport, SubjectReport,
};
use studyflow_core::format::{
    format_date_opt, format_minutes, format_ratio, format_trend, plural, progress_bar,
};
use studyflow_core::source::{load_rows, SyncSheetClient};
use studyflow_core::{Config, TaskNormalizer};

#[derive(Parser, Debug)]
#[command(name = "studyflow-report")]
#[command(about = "Study task analytics: accuracy, trends, streaks and habits")]
#[command(version)]
#[command(group(ArgGroup::new("rows").required(true).args(["input", "fetch"])))]
struct Args {
    /// Spreadsheet export to read (.json or .csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Fetch rows from the configured Apps Script endpoint
    #[arg(long)]
    fetch: bool,

    /// Report date, YYYY-MM-DD (default: today)
    #[arg(long)]
    as_of: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only show the report for this subject (text and md)
    #[arg(short, long)]
    subject: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Md,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    let _log_guard = studyflow_core::logging::init(&config.logging).ok();

    let as_of = match &args.as_of {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --as-of date '{}'. Use YYYY-MM-DD", raw))?,
        None => Local::now().date_naive(),
    };

    let rows = if let Some(path) = &args.input {
        load_rows(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        if !config.source.is_ready() {
            anyhow::bail!(
                "No endpoint configured. Set [source].endpoint in {}",
                Config::config_path().display()
            );
        }
        let client = SyncSheetClient::new(&config.source).context("failed to create client")?;
        client.fetch_rows().context("failed to fetch study tasks")?
    };

    let tasks = TaskNormalizer::new().normalize(&rows);
    if tasks.is_empty() {
        println!("No study tasks found.");
        return Ok(());
    }

    let inferred = tasks.iter().filter(|t| t.date_inferred).count();
    if inferred > 0 {
        eprintln!(
            "Note: {} had no start time or timestamp and were dated today.",
            plural(inferred, "task")
        );
    }

    let report = build_study_report(&tasks, &ReportOptions::from_config(&config, as_of));

    let subject = match &args.subject {
        Some(name) => Some(
            report
                .subject(name)
                .with_context(|| format!("No subject named '{}'", name))?,
        ),
        None => None,
    };

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Md => print_markdown(&report, subject),
        OutputFormat::Text => print_terminal(&report, subject),
    }

    Ok(())
}

fn print_terminal(report: &StudyReport, only: Option<&SubjectReport>) {
    let title = format!("STUDY REPORT as of {}", report.as_of.format("%Y-%m-%d"));
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if let Some(subject) = only {
        print_subject_terminal(subject);
        return;
    }

    println!("OVERVIEW");
    println!(
        "   Tasks:    {:<12} Correct: {}",
        report.overall.total,
        format_ratio(
            report.overall.correct,
            report.overall.total,
            report.overall.accuracy_percent
        )
    );
    println!(
        "   Trend:    {:<12} Level:   {}",
        format_trend(&report.progress.overall_trend),
        report.progress.improvement_level.display_name()
    );
    println!();

    println!("SUBJECTS");
    for subject in &report.subjects {
        print_subject_terminal(subject);
    }
    if let Some(comparison) = &report.subject_comparison {
        println!(
            "   Strongest: {} ({}%)   Weakest: {} ({}%)",
            comparison.strongest.key,
            comparison.strongest.accuracy,
            comparison.weakest.key,
            comparison.weakest.accuracy
        );
        println!();
    }

    let performance = &report.performance;
    println!("PERFORMANCE");
    println!(
        "   Average:  {}%   Consistency: {}/100",
        performance.average_accuracy, performance.consistency_score
    );
    if let (Some(best), Some(worst)) = (&performance.best_day, &performance.worst_day) {
        println!(
            "   Best day: {} ({}%)   Worst day: {} ({}%)",
            format_date_opt(Some(best.date)),
            best.accuracy,
            format_date_opt(Some(worst.date)),
            worst.accuracy
        );
    }
    for period in &performance.trends_by_period {
        println!(
            "   {:<8} {:<22} {}",
            period.period,
            format_trend(&period.trend),
            plural(period.active_days, "active day")
        );
    }
    println!();

    let time_of_day = &report.time_of_day;
    println!("TIME OF DAY");
    for bucket in time_of_day.per_bucket.iter().filter(|b| b.total > 0) {
        println!(
            "   {:<10} {} {}",
            bucket.key,
            progress_bar(bucket.accuracy, 20),
            format_ratio(bucket.correct, bucket.total, bucket.accuracy)
        );
    }
    for recommendation in &time_of_day.recommendations {
        println!("   * {}", recommendation.message());
    }
    println!();

    let locations = &report.locations;
    if !locations.per_location.is_empty() {
        println!("LOCATIONS");
        for location in &locations.per_location {
            println!(
                "   {:<14} {}",
                location.location,
                format_ratio(location.correct, location.total, location.accuracy)
            );
        }
        for pair in &locations.significant_pairwise_differences {
            println!(
                "   {} beats {} by {} points",
                pair.better, pair.worse, pair.difference
            );
        }
        println!();
    }

    let progress = &report.progress;
    let streaks = &progress.streak_data;
    println!("STREAKS");
    println!("   Current:  {}", plural(streaks.current_streak, "day"));
    println!("   Longest:  {}", plural(streaks.longest_streak, "day"));
    println!(
        "   Active:   {} of {} days ({:.0}%)",
        streaks.active_days,
        streaks.total_days,
        streaks.activity_percentage()
    );
    for reward in &progress.unlocked_rewards {
        println!("   + {} ({})", reward.label, plural(reward.days as usize, "day"));
    }
    if let Some(next) = &progress.next_reward {
        println!("   Next:     {} at {}", next.label, plural(next.days as usize, "day"));
    }
    println!();

    println!("MILESTONES");
    for milestone in progress.milestones.iter().filter(|m| !m.achieved).take(3) {
        println!(
            "   {:<18} {} {}%",
            milestone_label(milestone),
            progress_bar(milestone.progress, 20),
            milestone.progress
        );
    }
    println!();

    let sessions = &report.sessions;
    if !sessions.sessions.is_empty() {
        println!("SESSIONS");
        println!(
            "   {}, {:.1} tasks each, {}% average accuracy",
            plural(sessions.sessions.len(), "session"),
            sessions.average_tasks_per_session,
            sessions.average_accuracy
        );
        if let Some(minutes) = sessions.average_duration_minutes {
            println!("   Typical length: {}", format_minutes(minutes));
        }
        println!();
    }
}

fn print_subject_terminal(subject: &SubjectReport) {
    println!(
        "   {:<16} {:<18} {}",
        subject.subject,
        format_ratio(
            subject.stats.correct,
            subject.stats.total,
            subject.stats.accuracy_percent
        ),
        format_trend(&subject.trend)
    );
    for category in &subject.weak_categories {
        println!("      weak:   {} ({}%)", category.key, category.accuracy);
    }
    for category in &subject.strong_categories {
        println!("      strong: {} ({}%)", category.key, category.accuracy);
    }
}

fn milestone_label(milestone: &studyflow_core::analytics::Milestone) -> String {
    use studyflow_core::analytics::MilestoneKind;
    match milestone.kind {
        MilestoneKind::TaskCount => format!("{} tasks", milestone.target),
        MilestoneKind::Accuracy => format!("{}% accuracy", milestone.target),
    }
}

fn print_markdown(report: &StudyReport, only: Option<&SubjectReport>) {
    println!("# Study Report ({})", report.as_of.format("%Y-%m-%d"));
    println!();

    if let Some(subject) = only {
        print_subject_markdown(subject);
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Tasks | {} |", report.overall.total);
    println!("| Correct | {} |", report.overall.correct);
    println!("| Accuracy | {}% |", report.overall.accuracy_percent);
    println!("| Trend | {} |", format_trend(&report.progress.overall_trend));
    println!(
        "| Current streak | {} |",
        plural(report.progress.streak_data.current_streak, "day")
    );
    println!("| Consistency | {}/100 |", report.performance.consistency_score);
    println!();

    println!("## Subjects");
    println!();
    for subject in &report.subjects {
        print_subject_markdown(subject);
    }

    println!("## Time of Day");
    println!();
    println!("| Bucket | Tasks | Accuracy |");
    println!("|--------|-------|----------|");
    for bucket in &report.time_of_day.per_bucket {
        println!("| {} | {} | {}% |", bucket.key, bucket.total, bucket.accuracy);
    }
    println!();
    for recommendation in &report.time_of_day.recommendations {
        println!("- {}", recommendation.message());
    }
    println!();

    if !report.locations.per_location.is_empty() {
        println!("## Locations");
        println!();
        println!("| Location | Tasks | Accuracy |");
        println!("|----------|-------|----------|");
        for location in &report.locations.per_location {
            println!(
                "| {} | {} | {}% |",
                location.location, location.total, location.accuracy
            );
        }
        println!();
    }

    let progress = &report.progress;
    println!("## Progress");
    println!();
    for week in &progress.weekly_buckets {
        println!(
            "- **{}:** {}",
            week.label,
            format_ratio(week.correct, week.total, week.accuracy)
        );
    }
    println!();
    if !progress.unlocked_rewards.is_empty() {
        let labels: Vec<&str> = progress
            .unlocked_rewards
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        println!("**Rewards:** {}", labels.join(", "));
        println!();
    }

    println!("---");
    println!("*Generated by studyflow-report*");
}

fn print_subject_markdown(subject: &SubjectReport) {
    println!("### {}", subject.subject);
    println!();
    println!(
        "{} correct, trend {}",
        format_ratio(
            subject.stats.correct,
            subject.stats.total,
            subject.stats.accuracy_percent
        ),
        format_trend(&subject.trend)
    );
    println!();
    if !subject.category_performance.is_empty() {
        println!("| Category | Tasks | Accuracy |");
        println!("|----------|-------|----------|");
        for category in &subject.category_performance {
            let marker = if category.is_weak() {
                " (weak)"
            } else if category.is_strong() {
                " (strong)"
            } else {
                ""
            };
            println!(
                "| {}{} | {} | {}% |",
                category.key, marker, category.total, category.accuracy
            );
        }
        println!();
    }
}

fn print_json(report: &StudyReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
