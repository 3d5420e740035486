//! Worktree snapshots.
//!
//! [`SnapshotGraph::build`] walks a directory into a map of directory to
//! children, and [`write_tree`] turns that map into tree objects, deepest
//! directories first, so every tree is written after all of its children.

pub mod graph;
pub mod write;

pub use graph::{Child, ChildKind, SnapshotGraph};
pub use write::{snapshot, write_tree, write_tree_with_stats, SnapshotStats};

use std::path::PathBuf;

/// Name of the store's metadata directory, never part of a snapshot.
pub const STORE_DIR_NAME: &str = ".texam";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("tree id for {0} requested before it was written")]
    InternalInvariant(PathBuf),

    #[error("cannot snapshot {path}: {source}")]
    InvalidName {
        path: PathBuf,
        #[source]
        source: texam_object::ObjectError,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] texam_store::StoreError),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
