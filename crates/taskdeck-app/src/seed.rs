//! First-run bootstrap of the task collection.
//!
//! Seeding used to be an implicit side effect of the first render; here it is
//! an explicit startup call with a visible outcome. `initialize` runs once
//! per process, short-circuits when the store already holds tasks, and
//! recovers every failure by handing back an empty repository — a broken seed
//! document means "no tasks yet", never a startup error.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use taskdeck_core::{Task, import_tasks};
use taskdeck_store::KeyValueStore;

use crate::repository::TaskRepository;

/// Source of the sample-task document fetched on first run.
pub trait SeedSource {
    /// Human-readable label for log messages.
    fn describe(&self) -> String;

    /// Fetch the raw seed document.
    ///
    /// # Errors
    /// Returns an error when the document cannot be retrieved.
    fn fetch(&self) -> Result<String>;
}

/// Seed document bundled on disk at a well-known path.
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    /// Point the source at a seed document on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeedSource for FileSeedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read seed document {}", self.path.display()))
    }
}

/// Seed document fetched over HTTP with a one-shot blocking GET.
///
/// No explicit timeout is configured; the transport default applies.
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
}

impl HttpSeedSource {
    /// Point the source at a seed document URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl SeedSource for HttpSeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String> {
        let response = reqwest::blocking::get(&self.url)
            .with_context(|| format!("failed to fetch seed document from {}", self.url))?
            .error_for_status()
            .context("seed endpoint returned an error status")?;
        response.text().context("failed to read seed response body")
    }
}

/// What the startup bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held a non-empty collection; nothing was fetched.
    AlreadyInitialized,
    /// The seed document was loaded; carries the number of tasks.
    Seeded(usize),
    /// Fetch or validation failed; the session starts with no tasks.
    EmptyFallback,
}

/// Open the repository and seed it when the store is empty.
///
/// The outcome reports whether seeding happened; failures are logged and
/// recovered, so this function never errors.
pub fn initialize<S: KeyValueStore>(store: S, seed: &dyn SeedSource) -> (TaskRepository<S>, SeedOutcome) {
    let mut repository = TaskRepository::open(store);
    if !repository.is_empty() {
        return (repository, SeedOutcome::AlreadyInitialized);
    }
    match fetch_and_decode(seed) {
        Ok(tasks) => {
            let count = tasks.len();
            match repository.replace_all(tasks) {
                Ok(()) => (repository, SeedOutcome::Seeded(count)),
                Err(err) => {
                    warn!(
                        source = %seed.describe(),
                        error = %err,
                        "seed document rejected; starting with an empty collection"
                    );
                    (repository, SeedOutcome::EmptyFallback)
                }
            }
        }
        Err(err) => {
            warn!(
                source = %seed.describe(),
                error = %err,
                "could not load sample tasks; starting with an empty collection"
            );
            (repository, SeedOutcome::EmptyFallback)
        }
    }
}

fn fetch_and_decode(seed: &dyn SeedSource) -> Result<Vec<Task>> {
    let document = seed.fetch()?;
    import_tasks(&document).context("seed document failed validation")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use taskdeck_core::Status;
    use taskdeck_store::{KeyValueStore, MemoryStore};

    const SEED_DOCUMENT: &str = r#"[
        {
            "id": "seed-1",
            "title": "Explore the dashboard",
            "description": "Have a look around",
            "dueDate": "2025-08-01",
            "priority": "Low",
            "status": "To-do",
            "tags": ["sample"],
            "createdAt": "2025-07-01T08:00:00Z"
        },
        {
            "id": "seed-2",
            "title": "Finish something",
            "dueDate": "2025-07-15",
            "priority": "High",
            "status": "Done",
            "createdAt": "2025-07-01T08:00:00Z",
            "completedAt": "2025-07-10T12:00:00Z"
        }
    ]"#;

    struct StaticSeed(&'static str);

    impl SeedSource for StaticSeed {
        fn describe(&self) -> String {
            "static".into()
        }

        fn fetch(&self) -> Result<String> {
            Ok(self.0.to_owned())
        }
    }

    struct BrokenSeed;

    impl SeedSource for BrokenSeed {
        fn describe(&self) -> String {
            "broken".into()
        }

        fn fetch(&self) -> Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn empty_store_gets_seeded() {
        let (repository, outcome) = initialize(MemoryStore::default(), &StaticSeed(SEED_DOCUMENT));
        assert_eq!(outcome, SeedOutcome::Seeded(2));
        assert_eq!(repository.len(), 2);
        assert_eq!(repository.snapshot()[1].status, Status::Done);
    }

    #[test]
    fn populated_store_is_left_alone() {
        let existing = r#"[{
            "id": "mine-1",
            "title": "mine",
            "dueDate": "2025-08-01",
            "priority": "Medium",
            "status": "To-do",
            "createdAt": "2025-07-01T08:00:00Z"
        }]"#;
        let store = MemoryStore::default();
        store.set(crate::TASKS_KEY, existing.as_bytes()).unwrap();

        let (repository, outcome) = initialize(store, &StaticSeed(SEED_DOCUMENT));
        assert_eq!(outcome, SeedOutcome::AlreadyInitialized);
        assert_eq!(repository.len(), 1);
        assert_eq!(repository.snapshot()[0].title, "mine");
    }

    #[test]
    fn empty_persisted_array_still_triggers_seeding() {
        let store = MemoryStore::default();
        store.set(crate::TASKS_KEY, b"[]").unwrap();

        let (repository, outcome) = initialize(store, &StaticSeed(SEED_DOCUMENT));
        assert_eq!(outcome, SeedOutcome::Seeded(2));
        assert_eq!(repository.len(), 2);
    }

    #[test]
    fn fetch_failure_falls_back_to_empty() {
        let (repository, outcome) = initialize(MemoryStore::default(), &BrokenSeed);
        assert_eq!(outcome, SeedOutcome::EmptyFallback);
        assert!(repository.is_empty());
    }

    #[test]
    fn invalid_seed_document_falls_back_to_empty() {
        let (repository, outcome) =
            initialize(MemoryStore::default(), &StaticSeed(r#"[{"id":"1"}]"#));
        assert_eq!(outcome, SeedOutcome::EmptyFallback);
        assert!(repository.is_empty());
    }

    #[test]
    fn missing_seed_file_falls_back_to_empty() {
        let source = FileSeedSource::new("/definitely/not/here/data.json");
        let (repository, outcome) = initialize(MemoryStore::default(), &source);
        assert_eq!(outcome, SeedOutcome::EmptyFallback);
        assert!(repository.is_empty());
    }
}
