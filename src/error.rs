use thiserror::Error;

/// Validation failures surfaced to the user as an acknowledgement prompt
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    #[error("Please enter a task first.")]
    EmptyText,
    #[error("There are no tasks to clear.")]
    NothingToClear,
    #[error("There are no completed tasks.")]
    NoCompleted,
    #[error("No more task ids are available.")]
    IdsExhausted,
}

/// Failures inside the storage layer; always recovered by the persistence adapter
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored payload is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored payload has unsupported version {0}")]
    UnsupportedVersion(u32),
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}
