use std::fs;
use std::path::{Path, PathBuf};

use texam_utils::lockfile::LockFile;
use tracing::info;

use crate::config::Config;
use crate::{InitOptions, RepoError, HEAD_FILE, OBJECTS_DIR, REPO_DIR_NAME};

/// Create `.texam/` under `worktree`:
///
/// - `objects/`
/// - `config` holding the credentials
/// - `HEAD`, empty until the first commit
///
/// Returns the absolute worktree path.
pub(crate) fn init_repository(worktree: &Path, options: &InitOptions) -> Result<PathBuf, RepoError> {
    let worktree = if worktree.is_relative() {
        std::env::current_dir()?.join(worktree)
    } else {
        worktree.to_path_buf()
    };
    if !worktree.is_dir() {
        return Err(RepoError::MissingWorktree(worktree));
    }

    if options.username.is_empty() {
        return Err(RepoError::MissingMetadata("username"));
    }
    if options.password.is_empty() {
        return Err(RepoError::MissingMetadata("password"));
    }

    let repo_dir = worktree.join(REPO_DIR_NAME);
    if repo_dir.join(HEAD_FILE).is_file() {
        return Err(RepoError::AlreadyInitialized(worktree));
    }

    fs::create_dir_all(repo_dir.join(OBJECTS_DIR))?;

    let mut config = Config::with_credentials(&options.username, &options.password);
    config.core.require_test_id = options.require_test_id;
    config.remote.url = options.remote_url.clone();
    config.save(&repo_dir.join("config"))?;

    LockFile::replace(repo_dir.join(HEAD_FILE), b"")?;

    info!(path = %repo_dir.display(), "initialized empty texam repository");
    Ok(worktree)
}
