//! Content-addressed object storage.
//!
//! Each object lives at `<objects>/XX/YYYY...` where `XX` is the first two
//! hex characters of its id (the shard) and `YYYY...` the remaining 38. The
//! file is the zlib-compressed `"<kind> <len>\0<payload>"`, and the id is the
//! SHA-1 of the uncompressed bytes, so a file is never rewritten once it
//! exists.

mod enumerate;
mod prefix;
mod read;
mod write;

pub use enumerate::ObjectIter;
pub use prefix::MIN_PREFIX_LEN;
pub use write::Written;

use std::path::{Path, PathBuf};

use texam_hash::ObjectId;
use texam_object::ObjectKind;

/// Handle on an `objects/` directory.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression_level: flate2::Compression,
}

impl ObjectStore {
    /// Open the store at `objects_dir` without checking that it exists.
    ///
    /// Operations on a missing directory fail with [`StoreError::InvalidRepo`].
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression_level: flate2::Compression::default(),
        }
    }

    /// Open the store, failing if `objects_dir` is not a directory.
    pub fn open_checked(objects_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self::open(objects_dir);
        store.ensure_exists()?;
        Ok(store)
    }

    /// Set the zlib compression level (0–9).
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = flate2::Compression::new(level.min(9));
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Where the object with `oid` is (or would be) stored.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        let (shard, rest) = oid.shard();
        self.objects_dir.join(shard).join(rest)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.objects_dir.is_dir() {
            Ok(())
        } else {
            Err(StoreError::InvalidRepo(self.objects_dir.clone()))
        }
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a texam object store: {0} does not exist")]
    InvalidRepo(PathBuf),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("short object id {prefix} is ambiguous ({count} candidates)")]
    Ambiguous { prefix: String, count: usize },

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: String, reason: String },

    #[error("object {oid} is a {actual}, not a {expected}")]
    KindMismatch {
        oid: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("hash error: {0}")]
    Hash(#[from] texam_hash::HashError),
}

impl StoreError {
    pub(crate) fn corrupt(oid: &ObjectId, reason: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            oid: oid.to_hex(),
            reason: reason.to_string(),
        }
    }
}
