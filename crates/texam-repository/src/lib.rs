//! A texam repository: a worktree with a `.texam/` directory holding the
//! object store, the credentials config and the head pointer.

mod commit;
pub mod config;
mod discover;
mod error;
mod head;
mod init;

pub use commit::CommitMetadata;
pub use config::Config;
pub use error::RepoError;

use std::path::{Path, PathBuf};

use texam_hash::ObjectId;
use texam_object::{Object, ObjectKind};
use texam_snapshot::{SnapshotGraph, SnapshotStats};
use texam_store::{ObjectStore, StoreError};
use tracing::info;

/// Name of the repository directory inside a worktree.
pub const REPO_DIR_NAME: &str = texam_snapshot::STORE_DIR_NAME;
pub const OBJECTS_DIR: &str = "objects";
pub const HEAD_FILE: &str = "HEAD";
pub const CONFIG_FILE: &str = "config";

/// Options for [`Repository::init`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub username: String,
    pub password: String,
    pub require_test_id: bool,
    pub remote_url: Option<String>,
}

impl InitOptions {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }
}

pub struct Repository {
    worktree: PathBuf,
    repo_dir: PathBuf,
    store: ObjectStore,
    config: Config,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("worktree", &self.worktree)
            .field("repo_dir", &self.repo_dir)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the repository whose worktree root is `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let worktree = path.as_ref();
        let repo_dir = worktree.join(REPO_DIR_NAME);
        if !discover::is_worktree(worktree) || !repo_dir.join(HEAD_FILE).is_file() {
            return Err(RepoError::InvalidRepo(worktree.to_path_buf()));
        }

        let config = Config::load(&repo_dir.join(CONFIG_FILE))?;
        let mut store = ObjectStore::open(repo_dir.join(OBJECTS_DIR));
        if let Some(level) = config.core.compression {
            store.set_compression_level(level);
        }

        Ok(Self {
            worktree: worktree.to_path_buf(),
            repo_dir,
            store,
            config,
        })
    }

    /// Open the repository enclosing `start`, searching parent directories.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let worktree = discover::discover_worktree(start.as_ref())?;
        Self::open(worktree)
    }

    /// Create a repository in the existing directory `path`.
    pub fn init(path: impl AsRef<Path>, options: &InitOptions) -> Result<Self, RepoError> {
        let worktree = init::init_repository(path.as_ref(), options)?;
        Self::open(worktree)
    }

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    /// The `.texam` directory.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> PathBuf {
        self.repo_dir.join(CONFIG_FILE)
    }

    /// Write the in-memory config back to disk.
    pub fn save_config(&self) -> Result<(), RepoError> {
        self.config.save(&self.config_path())
    }

    pub fn head_path(&self) -> PathBuf {
        self.repo_dir.join(HEAD_FILE)
    }

    /// The current commit, or `None` before the first commit.
    pub fn head(&self) -> Result<Option<ObjectId>, RepoError> {
        head::read_head(&self.head_path())
    }

    /// The current commit; `NoHead` before the first commit.
    pub fn head_commit(&self) -> Result<ObjectId, RepoError> {
        self.head()?.ok_or(RepoError::NoHead)
    }

    /// Write the worktree into the store. Returns the root tree id.
    pub fn snapshot(&self) -> Result<ObjectId, RepoError> {
        self.snapshot_with_stats().map(|(oid, _)| oid)
    }

    pub fn snapshot_with_stats(&self) -> Result<(ObjectId, SnapshotStats), RepoError> {
        self.ensure_store()?;
        let graph = SnapshotGraph::build(&self.worktree)?;
        Ok(texam_snapshot::write_tree_with_stats(&self.store, &graph)?)
    }

    /// Record a commit of `tree` and move `HEAD` to it.
    ///
    /// A commit without a test id falls back to `remote.test_id`, and is
    /// refused when `core.require_test_id` is set and neither is present.
    pub fn commit(&self, tree: ObjectId, metadata: &CommitMetadata) -> Result<ObjectId, RepoError> {
        self.ensure_store()?;

        let (kind, _) = self.store.read_header(&tree)?;
        if kind != ObjectKind::Tree {
            return Err(StoreError::KindMismatch {
                oid: tree,
                expected: ObjectKind::Tree,
                actual: kind,
            }
            .into());
        }

        let mut metadata = metadata.clone();
        if metadata.test_id.is_none() {
            metadata.test_id = self.config.remote.test_id.clone();
        }
        let commit = metadata.to_commit(tree, self.config.core.require_test_id)?;

        let oid = self.store.write(&Object::Commit(commit))?;
        head::write_head(&self.head_path(), &oid)?;

        info!(
            commit = %oid,
            tree = %tree,
            author = %metadata.author,
            test = metadata.test_id.as_deref().unwrap_or("-"),
            "committed"
        );
        Ok(oid)
    }

    /// Snapshot the worktree and commit it.
    pub fn commit_worktree(&self, metadata: &CommitMetadata) -> Result<ObjectId, RepoError> {
        let tree = self.snapshot()?;
        self.commit(tree, metadata)
    }

    /// Files a push uploads: the head file, then every object reachable from
    /// the head commit in walk order.
    pub fn transfer_set(&self) -> Result<Vec<PathBuf>, RepoError> {
        let head = self.head_commit()?;
        let mut files = vec![self.head_path()];
        files.extend(texam_revwalk::objects_for(&self.store, head)?);
        Ok(files)
    }

    fn ensure_store(&self) -> Result<(), RepoError> {
        if self.store.objects_dir().is_dir() {
            Ok(())
        } else {
            Err(RepoError::InvalidRepo(self.worktree.clone()))
        }
    }
}
