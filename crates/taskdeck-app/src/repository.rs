//! The owning task repository.
//!
//! One repository instance holds the canonical in-memory collection for the
//! whole process and is passed explicitly to every consumer; there is no
//! ambient global. Each mutation updates the collection and then writes the
//! full document back through the store before returning.

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

use taskdeck_core::id::TaskId;
use taskdeck_core::{Status, Task, TaskDraft, export_tasks};
use taskdeck_store::KeyValueStore;

/// Fixed store key holding the serialized collection.
pub const TASKS_KEY: &str = "tasks";

/// Errors surfaced by repository mutations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A bulk replacement carried records without a usable id or title.
    #[error("invalid import format: {0}")]
    InvalidImportFormat(String),
}

/// In-memory task collection persisting through a key-value store.
///
/// Persistence is synchronous best-effort: a failing store write is logged
/// and swallowed, leaving the in-memory state authoritative for the rest of
/// the session. Mutations therefore never fail for storage reasons.
pub struct TaskRepository<S> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskRepository<S> {
    /// Open the repository, loading whatever the store currently holds.
    ///
    /// Unreadable or corrupt persisted state is logged and discarded; the
    /// session starts from an empty collection rather than failing startup.
    pub fn open(store: S) -> Self {
        let tasks = match store.get(TASKS_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Task>>(&bytes) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(error = %err, "persisted tasks are unreadable; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                let err: anyhow::Error = err.into();
                warn!(error = %err, "could not read the task store; starting empty");
                Vec::new()
            }
        };
        Self { store, tasks }
    }

    /// Create a task from a draft and append it to the collection.
    ///
    /// Assigns a fresh id and creation timestamp and forces the initial
    /// status to [`Status::ToDo`]. Draft validation (non-empty title, present
    /// due date) is the caller's contract, not re-checked here.
    pub fn create(&mut self, draft: TaskDraft) -> Task {
        let task = Task::from_draft(draft, TaskId::generate(), OffsetDateTime::now_utc());
        self.tasks.push(task.clone());
        self.persist();
        task
    }

    /// Replace the stored record matching `incoming.id` wholesale.
    ///
    /// The one exception is `completed_at`, which is derived from the record
    /// previously stored: the first transition to [`Status::Done`] stamps the
    /// current time, every other update carries the old value forward and the
    /// incoming field is ignored. An unmatched id is a silent no-op.
    pub fn update(&mut self, incoming: Task) {
        let Some(stored) = self.tasks.iter_mut().find(|task| task.id == incoming.id) else {
            debug!(id = %incoming.id, "update targeted an unknown task; ignoring");
            return;
        };
        let completed_at = if incoming.status == Status::Done && stored.completed_at.is_none() {
            Some(OffsetDateTime::now_utc())
        } else {
            stored.completed_at
        };
        *stored = Task {
            completed_at,
            ..incoming
        };
        self.persist();
    }

    /// Remove the record with the given id; absent ids are a no-op.
    pub fn delete(&mut self, id: &TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.tasks.len() == before {
            debug!(%id, "delete targeted an unknown task; ignoring");
        }
        self.persist();
    }

    /// Atomically replace the whole collection.
    ///
    /// Every record must carry a non-empty id and title; otherwise the call
    /// is rejected and the current collection is left untouched.
    ///
    /// # Errors
    /// [`RepositoryError::InvalidImportFormat`] when validation fails.
    pub fn replace_all(&mut self, tasks: Vec<Task>) -> Result<(), RepositoryError> {
        for (index, task) in tasks.iter().enumerate() {
            if task.id.is_empty() {
                return Err(RepositoryError::InvalidImportFormat(format!(
                    "task at index {index} has an empty id"
                )));
            }
            if task.title.is_empty() {
                return Err(RepositoryError::InvalidImportFormat(format!(
                    "task at index {index} has an empty title"
                )));
            }
        }
        self.tasks = tasks;
        self.persist();
        Ok(())
    }

    /// Cloned, ordered view of the collection.
    ///
    /// Callers get an independent copy and can never alias or mutate the
    /// canonical state.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Look up a single task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Number of tasks in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn persist(&self) {
        let payload = match export_tasks(&self.tasks) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "could not serialize tasks; skipping persist");
                return;
            }
        };
        if let Err(err) = self.store.set(TASKS_KEY, payload.as_bytes()) {
            let err: anyhow::Error = err.into();
            warn!(error = %err, "could not persist tasks; keeping in-memory state");
        }
    }
}
