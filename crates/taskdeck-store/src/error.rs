//! Error types for taskdeck store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing the key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key contains path separators or is otherwise unusable.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The atomic rename of a freshly written value failed.
    #[error("failed to persist value: {0}")]
    Persist(#[from] tempfile::PersistError),
}
