//! Reachability walking: every object a commit depends on.
//!
//! [`ObjectWalk`] yields the commit, its root tree, then the tree's contents
//! depth-first. [`objects_for`] turns that into the list of object files a
//! push has to carry.

mod walk;

pub use walk::{objects_for, ObjectWalk, WalkItem};

use texam_hash::ObjectId;

/// Errors produced while walking objects.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("object is not a commit: {0}")]
    NotACommit(ObjectId),

    #[error(transparent)]
    Store(#[from] texam_store::StoreError),
}
