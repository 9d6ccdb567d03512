//! End-to-end bootstrap: file-backed store plus a bundled seed document.

#![allow(clippy::unwrap_used)]

use taskdeck_app::{FileSeedSource, SeedOutcome, TaskRepository, initialize};
use taskdeck_core::{Priority, Status, TaskDraft, parse_date};
use taskdeck_store::FileStore;
use tempfile::TempDir;

const SEED_DOCUMENT: &str = r#"[
    {
        "id": "seed-1",
        "title": "Explore the dashboard",
        "dueDate": "2025-08-01",
        "priority": "Low",
        "status": "To-do",
        "tags": ["sample"],
        "createdAt": "2025-07-01T08:00:00Z"
    }
]"#;

fn write_seed(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("data.json");
    std::fs::write(&path, SEED_DOCUMENT).unwrap();
    path
}

#[test]
fn first_run_seeds_and_later_runs_reuse_the_store() {
    let data_dir = TempDir::new().unwrap();
    let seed_path = write_seed(&data_dir);
    let seed = FileSeedSource::new(&seed_path);

    // First run: empty store, seed document applies.
    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let (mut repository, outcome) = initialize(store, &seed);
    assert_eq!(outcome, SeedOutcome::Seeded(1));

    // A user mutation persists alongside the seeded task.
    repository.create(TaskDraft {
        title: "my own task".into(),
        description: String::new(),
        due_date: parse_date("2025-09-01").unwrap(),
        priority: Priority::High,
        tags: vec!["home".into()],
    });
    drop(repository);

    // Second run: the store is non-empty, the seed is not re-applied.
    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let (repository, outcome) = initialize(store, &seed);
    assert_eq!(outcome, SeedOutcome::AlreadyInitialized);
    assert_eq!(repository.len(), 2);

    let tasks = repository.snapshot();
    assert_eq!(tasks[0].title, "Explore the dashboard");
    assert_eq!(tasks[1].title, "my own task");
    assert_eq!(tasks[1].status, Status::ToDo);
}

#[test]
fn deleting_the_last_task_makes_the_next_run_reseed() {
    let data_dir = TempDir::new().unwrap();
    let seed_path = write_seed(&data_dir);
    let seed = FileSeedSource::new(&seed_path);

    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let (mut repository, _) = initialize(store, &seed);
    let id = repository.snapshot()[0].id.clone();
    repository.delete(&id);
    assert!(repository.is_empty());
    drop(repository);

    // The persisted collection is now an empty array, which counts as
    // uninitialized for the seed check.
    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let (repository, outcome) = initialize(store, &seed);
    assert_eq!(outcome, SeedOutcome::Seeded(1));
    assert_eq!(repository.len(), 1);
}

#[test]
fn reopening_without_a_seed_source_keeps_state_intact() {
    let data_dir = TempDir::new().unwrap();
    let seed_path = write_seed(&data_dir);

    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let (mut repository, _) = initialize(store, &FileSeedSource::new(&seed_path));
    repository.create(TaskDraft {
        title: "before the seed vanished".into(),
        description: String::new(),
        due_date: parse_date("2025-09-01").unwrap(),
        priority: Priority::Medium,
        tags: Vec::new(),
    });
    drop(repository);
    std::fs::remove_file(&seed_path).unwrap();

    // The missing seed document is irrelevant once the store has data.
    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let (repository, outcome) = initialize(store, &FileSeedSource::new(&seed_path));
    assert_eq!(outcome, SeedOutcome::AlreadyInitialized);
    assert_eq!(repository.len(), 2);
    drop(repository);

    // And with the store wiped as well, the fallback is an empty session.
    let store = FileStore::open(data_dir.path().join("fresh-store")).unwrap();
    let (repository, outcome) = initialize(store, &FileSeedSource::new(&seed_path));
    assert_eq!(outcome, SeedOutcome::EmptyFallback);
    assert!(repository.is_empty());
}

#[test]
fn open_alone_does_not_seed() {
    let data_dir = TempDir::new().unwrap();
    let store = FileStore::open(data_dir.path().join("store")).unwrap();
    let repository = TaskRepository::open(store);
    assert!(repository.is_empty());
}
