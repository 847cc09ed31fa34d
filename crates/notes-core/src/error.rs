//! Error types for the notes service.

use thiserror::Error;

/// Top-level result type for notes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Top-level error type for notes operations.
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("note store lock poisoned")]
    LockPoisoned,
}
