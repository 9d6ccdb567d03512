//! Pure, stateless views over a task collection.
//!
//! Every function here takes a slice and returns owned data; the input is
//! never mutated, so callers can hand the same snapshot to as many consumers
//! as they like.

use serde::Serialize;
use std::str::FromStr;
use time::{Date, Duration, OffsetDateTime};

use crate::{Priority, Status, Task, UnknownLabel};

/// Filter parameters for a task view.
///
/// `None` means "match anything" for that dimension. Text matching is a
/// case-insensitive substring search over the title; blank text matches
/// every task.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Search term applied to the title.
    pub text: Option<String>,
    /// Restrict to a single status.
    pub status: Option<Status>,
    /// Restrict to a single priority.
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Whether the filter matches every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.text.as_deref().is_none_or(|text| text.trim().is_empty())
    }

    /// Whether the given task passes every configured dimension.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.text_matches(&task.title)
            && self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
    }

    fn text_matches(&self, title: &str) -> bool {
        self.text.as_deref().is_none_or(|needle| {
            let needle = needle.trim().to_lowercase();
            needle.is_empty() || title.to_lowercase().contains(&needle)
        })
    }
}

/// Keep the tasks matching `filter`, preserving input order.
#[must_use]
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks.iter().filter(|task| filter.matches(task)).cloned().collect()
}

/// Sort dimension for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest due date first.
    DueDate,
    /// Highest priority first.
    Priority,
}

impl FromStr for SortKey {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "due" | "duedate" | "due-date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            _ => Err(UnknownLabel::new("sort key", s)),
        }
    }
}

/// Return a sorted copy of the collection.
///
/// The sort is stable: tasks comparing equal under the key retain their
/// relative order from the input.
#[must_use]
pub fn sorted(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut out = tasks.to_vec();
    match key {
        SortKey::DueDate => out.sort_by_key(|task| task.due_date),
        SortKey::Priority => out.sort_by_key(|task| task.priority.rank()),
    }
    out
}

/// Aggregate counters for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of tasks in the collection.
    pub total: usize,
    /// Tasks currently in [`Status::Done`].
    pub completed: usize,
    /// Tasks currently in [`Status::InProgress`].
    pub in_progress: usize,
    /// Tasks due strictly before today and not done.
    pub overdue: usize,
}

/// Compute dashboard counters at the given moment.
///
/// Overdue compares the due date against `now` at day granularity, so a task
/// due today is not overdue yet.
#[must_use]
pub fn aggregate(tasks: &[Task], now: OffsetDateTime) -> Stats {
    let today = now.date();
    Stats {
        total: tasks.len(),
        completed: tasks.iter().filter(|task| task.status == Status::Done).count(),
        in_progress: tasks
            .iter()
            .filter(|task| task.status == Status::InProgress)
            .count(),
        overdue: tasks
            .iter()
            .filter(|task| task.due_date < today && task.status != Status::Done)
            .count(),
    }
}

/// One day of the completion trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// Calendar day (UTC).
    #[serde(with = "crate::date_only")]
    pub date: Date,
    /// Tasks whose completion fell on that day.
    pub completed: usize,
}

/// Completions per calendar day over the trailing window, oldest day first.
///
/// Produces exactly `window_days` entries ending with `today`, zero-filled
/// for days without completions. A task counts for the UTC day its
/// `completed_at` timestamp falls on, and only while its status is still
/// [`Status::Done`].
#[must_use]
pub fn completion_series(tasks: &[Task], today: Date, window_days: u16) -> Vec<DayCount> {
    (0..window_days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            let completed = tasks
                .iter()
                .filter(|task| {
                    task.status == Status::Done
                        && task.completed_at.is_some_and(|ts| ts.date() == date)
                })
                .count();
            DayCount { date, completed }
        })
        .collect()
}

/// Count tasks per status, buckets ordered by first appearance.
///
/// Statuses with no tasks are absent, mirroring the dashboard breakdown
/// which only charts slices that exist.
#[must_use]
pub fn count_by_status(tasks: &[Task]) -> Vec<(Status, usize)> {
    let mut buckets: Vec<(Status, usize)> = Vec::new();
    for task in tasks {
        match buckets.iter_mut().find(|(status, _)| *status == task.status) {
            Some((_, count)) => *count += 1,
            None => buckets.push((task.status, 1)),
        }
    }
    buckets
}

/// Count tasks per priority; always reports all three buckets, lowest first.
#[must_use]
pub fn count_by_priority(tasks: &[Task]) -> [(Priority, usize); 3] {
    let mut buckets = Priority::ALL.map(|priority| (priority, 0));
    for task in tasks {
        for (priority, count) in &mut buckets {
            if *priority == task.priority {
                *count += 1;
            }
        }
    }
    buckets
}
