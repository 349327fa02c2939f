use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("Access to repository denied")]
    AccessDenied,
    #[error("Snapshot `{0}` not found")]
    SnapshotNotFound(String),
    #[error("Path `{0}` not found in snapshot")]
    PathNotFound(String),
    #[error("Snapshot store command failed with code {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },
    #[error("Failed to parse snapshot store output: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
