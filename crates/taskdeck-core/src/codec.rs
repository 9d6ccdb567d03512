//! JSON import/export of whole task collections.
//!
//! The document format is a JSON array of task objects using the same field
//! layout as the persisted store, so an exported file can be re-imported
//! byte-for-byte and a persisted blob is itself a valid import document.

use serde_json::Value;
use thiserror::Error;

use crate::Task;

/// Errors surfaced by the import/export codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but does not describe a task collection.
    #[error("invalid task document: {0}")]
    Validation(String),
    /// The collection could not be rendered to JSON.
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Render the collection as a pretty-printed JSON array.
///
/// Output is a pure function of the input; `completedAt` appears only on
/// tasks that carry a completion timestamp.
///
/// # Errors
/// Returns [`CodecError::Serialize`] if JSON rendering fails.
pub fn export_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    serde_json::to_string_pretty(tasks).map_err(CodecError::Serialize)
}

/// Parse and validate an external JSON document into a task collection.
///
/// The whole document is rejected on the first problem; a partial collection
/// is never returned. Validation requires a JSON array whose every element
/// carries a non-empty string `id` and `title`; elements that then fail
/// typed decoding (malformed dates, unknown enum labels) are reported as
/// validation failures too.
///
/// # Errors
/// [`CodecError::Parse`] when the input is not JSON, [`CodecError::Validation`]
/// when it is JSON but not a well-formed task collection.
pub fn import_tasks(document: &str) -> Result<Vec<Task>, CodecError> {
    let value: Value = serde_json::from_str(document)?;
    let Some(items) = value.as_array() else {
        return Err(CodecError::Validation("expected a JSON array of tasks".into()));
    };
    for (index, item) in items.iter().enumerate() {
        require_string_field(item, index, "id")?;
        require_string_field(item, index, "title")?;
    }
    serde_json::from_value(value).map_err(|err| CodecError::Validation(err.to_string()))
}

fn require_string_field(item: &Value, index: usize, field: &str) -> Result<(), CodecError> {
    let present = item
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty());
    if present {
        Ok(())
    } else {
        Err(CodecError::Validation(format!(
            "task at index {index} is missing a non-empty {field:?}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use crate::{Priority, Status};
    use time::macros::{date, datetime};

    fn collection() -> Vec<Task> {
        vec![
            Task {
                id: TaskId::from("task-1"),
                title: "Plan sprint".into(),
                description: "Draft the backlog".into(),
                due_date: date!(2025 - 04 - 10),
                priority: Priority::Medium,
                status: Status::InProgress,
                tags: vec!["planning".into(), "planning".into()],
                created_at: datetime!(2025-04-01 08:00 UTC),
                completed_at: None,
            },
            Task {
                id: TaskId::from("task-2"),
                title: "Fix login bug".into(),
                description: String::new(),
                due_date: date!(2025 - 04 - 05),
                priority: Priority::High,
                status: Status::Done,
                tags: Vec::new(),
                created_at: datetime!(2025-04-02 10:00 UTC),
                completed_at: Some(datetime!(2025-04-04 16:45 UTC)),
            },
        ]
    }

    #[test]
    fn export_then_import_roundtrips() {
        let tasks = collection();
        let document = export_tasks(&tasks).unwrap();
        let imported = import_tasks(&document).unwrap();
        assert_eq!(imported, tasks);
    }

    #[test]
    fn export_is_deterministic_and_pretty() {
        let tasks = collection();
        let first = export_tasks(&tasks).unwrap();
        let second = export_tasks(&tasks).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("[\n"));
    }

    #[test]
    fn import_rejects_non_json() {
        let err = import_tasks("not json").unwrap_err();
        assert!(matches!(err, CodecError::Parse(_)));
    }

    #[test]
    fn import_rejects_non_array_documents() {
        let err = import_tasks("{\"tasks\": []}").unwrap_err();
        assert!(matches!(err, CodecError::Validation(_)));
    }

    #[test]
    fn import_rejects_missing_title() {
        let err = import_tasks(r#"[{"id":"1"}]"#).unwrap_err();
        match err {
            CodecError::Validation(message) => assert!(message.contains("title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn import_rejects_empty_id() {
        let err = import_tasks(r#"[{"id":"","title":"x"}]"#).unwrap_err();
        assert!(matches!(err, CodecError::Validation(_)));
    }

    #[test]
    fn import_reports_malformed_fields_as_validation() {
        let document = r#"[{
            "id": "1",
            "title": "x",
            "dueDate": "not-a-date",
            "priority": "High",
            "status": "To-do",
            "createdAt": "2025-04-01T08:00:00Z"
        }]"#;
        let err = import_tasks(document).unwrap_err();
        assert!(matches!(err, CodecError::Validation(_)));
    }

    #[test]
    fn import_defaults_optional_fields() {
        let document = r#"[{
            "id": "1",
            "title": "x",
            "dueDate": "2025-04-01",
            "priority": "Low",
            "status": "Done",
            "createdAt": "2025-03-01T08:00:00Z",
            "completedAt": "2025-03-20T12:00:00Z"
        }]"#;
        let tasks = import_tasks(document).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "");
        assert!(tasks[0].tags.is_empty());
        assert!(tasks[0].completed_at.is_some());
    }
}
