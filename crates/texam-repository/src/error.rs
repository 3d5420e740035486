use std::path::PathBuf;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a texam repository (or any of the parent directories): {0}")]
    InvalidRepo(PathBuf),

    #[error("cannot initialize texam repository: {0} does not exist")]
    MissingWorktree(PathBuf),

    #[error("texam repository already exists in {0}")]
    AlreadyInitialized(PathBuf),

    #[error("{0} must be specified")]
    MissingMetadata(&'static str),

    #[error("{field} must be a single line")]
    InvalidMetadata { field: &'static str },

    #[error("no commit yet: HEAD is empty")]
    NoHead,

    #[error("HEAD does not hold an object id: {0:?}")]
    CorruptHead(String),

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error(transparent)]
    Lock(#[from] texam_utils::UtilError),

    #[error(transparent)]
    Store(#[from] texam_store::StoreError),

    #[error(transparent)]
    Snapshot(#[from] texam_snapshot::SnapshotError),

    #[error(transparent)]
    Walk(#[from] texam_revwalk::WalkError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
