//! Domain types, query functions and the JSON codec for taskdeck.

/// Import/export of task collections as JSON documents.
pub mod codec;
/// Identifier types.
pub mod id;
/// Pure filtering, sorting and aggregation over task collections.
pub mod query;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::id::TaskId;

pub use crate::codec::{CodecError, export_tasks, import_tasks};
pub use crate::query::{
    DayCount, SortKey, Stats, TaskFilter, aggregate, completion_series, count_by_priority,
    count_by_status, filter_tasks, sorted,
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a day-granularity date in `YYYY-MM-DD` form.
///
/// # Errors
/// Returns a parse error when the input does not match the format.
pub fn parse_date(input: &str) -> Result<Date, time::error::Parse> {
    Date::parse(input, DATE_FORMAT)
}

/// A unit of work with title, dates, priority, status and tags.
///
/// Field names and enum labels on the wire follow the persisted JSON layout:
/// camelCase keys, `dueDate` as a date-only string, `createdAt`/`completedAt`
/// as RFC 3339 timestamps. `completedAt` is omitted entirely while unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, immutable after creation.
    pub id: TaskId,
    /// Human-readable title; non-empty at every edit/import boundary.
    pub title: String,
    /// Free-form description; may be empty.
    #[serde(default)]
    pub description: String,
    /// Calendar due date, no time component.
    #[serde(with = "date_only")]
    pub due_date: Date,
    /// Urgency ranking.
    pub priority: Priority,
    /// Lifecycle stage.
    pub status: Status,
    /// User-supplied tags, order preserved, duplicates permitted.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp, set once.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Stamped on the first transition to [`Status::Done`]; never cleared.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<OffsetDateTime>,
}

impl Task {
    /// Build a task from a draft, forcing the initial lifecycle state.
    #[must_use]
    pub fn from_draft(draft: TaskDraft, id: TaskId, created_at: OffsetDateTime) -> Self {
        let TaskDraft {
            title,
            description,
            due_date,
            priority,
            tags,
        } = draft;
        Self {
            id,
            title,
            description,
            due_date,
            priority,
            status: Status::ToDo,
            tags,
            created_at,
            completed_at: None,
        }
    }
}

/// Fields a caller supplies when creating a task.
///
/// Identifier, creation timestamp and status are assigned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// Human-readable title, validated non-empty by the caller.
    pub title: String,
    /// Free-form description; may be empty.
    pub description: String,
    /// Calendar due date.
    pub due_date: Date,
    /// Urgency ranking.
    pub priority: Priority,
    /// User-supplied tags.
    pub tags: Vec<String>,
}

/// Lifecycle stage of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Not started.
    #[serde(rename = "To-do")]
    ToDo,
    /// Actively being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Finished.
    Done,
}

impl Status {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Wire/display label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To-do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "to-do" | "todo" => Ok(Self::ToDo),
            "in progress" | "in-progress" | "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(UnknownLabel::new("status", s)),
        }
    }
}

/// Urgency ranking of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default urgency.
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire/display label for the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Fixed sort rank: High sorts first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownLabel::new("priority", s)),
        }
    }
}

/// Error returned when a textual label cannot be mapped to an enum value.
#[derive(Debug, Clone, Error)]
#[error("unknown {kind} label: {value:?}")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

impl UnknownLabel {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

mod date_only {
    //! Serde adapter for date-only `YYYY-MM-DD` strings.

    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let rendered = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&rendered)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
