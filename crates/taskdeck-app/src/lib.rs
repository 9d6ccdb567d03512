//! Application layer for taskdeck: the owning task repository and the
//! one-shot seed bootstrap.

/// The canonical, persisting task collection.
pub mod repository;
/// First-run seeding from a bundled or remote sample document.
pub mod seed;

pub use repository::{RepositoryError, TASKS_KEY, TaskRepository};
pub use seed::{FileSeedSource, HttpSeedSource, SeedOutcome, SeedSource, initialize};
