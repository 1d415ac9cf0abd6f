//! Study sessions: tasks linked by a shared `session_id`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::types::{accuracy_percent, Task};

/// One sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: u32,
    /// Earliest task start
    pub start: Option<NaiveDateTime>,
    /// Latest task end
    pub end: Option<NaiveDateTime>,
    /// Minutes from `start` to `end`, when both are known
    pub duration_minutes: Option<i64>,
    pub subjects: BTreeSet<String>,
}

/// Group tasks carrying a session id.
///
/// Sessions are ordered by start time, those without one last, then by id.
pub fn group_by_session<'a, I>(tasks: I) -> Vec<SessionSummary>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(id) = task.session_id.as_deref() {
            groups.entry(id).or_default().push(task);
        }
    }

    let mut sessions: Vec<SessionSummary> = groups
        .into_iter()
        .map(|(id, group)| {
            let total = group.len();
            let correct = group.iter().filter(|t| t.correct).count();
            let start = group.iter().filter_map(|t| t.start_time).min();
            let end = group.iter().filter_map(|t| t.end_time).max();
            let duration_minutes = match (start, end) {
                (Some(start), Some(end)) if end >= start => {
                    Some(end.signed_duration_since(start).num_minutes())
                }
                _ => None,
            };
            SessionSummary {
                session_id: id.to_string(),
                total,
                correct,
                accuracy: accuracy_percent(correct, total),
                start,
                end,
                duration_minutes,
                subjects: group.iter().map(|t| t.subject.clone()).collect(),
            }
        })
        .collect();

    // BTreeMap order already gives the id tie-break
    sessions.sort_by_key(|s| (s.start.is_none(), s.start));
    sessions
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub sessions: Vec<SessionSummary>,
    pub average_tasks_per_session: f64,
    pub average_accuracy: u32,
    /// Mean over sessions with a known duration
    pub average_duration_minutes: Option<i64>,
}

pub fn build_session_report<'a, I>(tasks: I) -> SessionReport
where
    I: IntoIterator<Item = &'a Task>,
{
    let sessions = group_by_session(tasks);
    if sessions.is_empty() {
        return SessionReport {
            sessions,
            average_tasks_per_session: 0.0,
            average_accuracy: 0,
            average_duration_minutes: None,
        };
    }

    let count = sessions.len() as f64;
    let total_tasks: usize = sessions.iter().map(|s| s.total).sum();
    let accuracy_sum: u32 = sessions.iter().map(|s| s.accuracy).sum();
    let durations: Vec<i64> = sessions.iter().filter_map(|s| s.duration_minutes).collect();

    SessionReport {
        average_tasks_per_session: total_tasks as f64 / count,
        average_accuracy: (f64::from(accuracy_sum) / count).round() as u32,
        average_duration_minutes: if durations.is_empty() {
            None
        } else {
            Some((durations.iter().sum::<i64>() as f64 / durations.len() as f64).round() as i64)
        },
        sessions,
    }
}
