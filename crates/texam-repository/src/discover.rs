use std::path::{Path, PathBuf};

use crate::{RepoError, OBJECTS_DIR, REPO_DIR_NAME};

/// Find the worktree containing `start` by walking up to the first
/// directory with a `.texam/objects/` inside.
pub(crate) fn discover_worktree(start: &Path) -> Result<PathBuf, RepoError> {
    let start =
        std::fs::canonicalize(start).map_err(|_| RepoError::InvalidRepo(start.to_path_buf()))?;

    start
        .ancestors()
        .find(|dir| is_worktree(dir))
        .map(Path::to_path_buf)
        .ok_or(RepoError::InvalidRepo(start.clone()))
}

pub(crate) fn is_worktree(dir: &Path) -> bool {
    dir.join(REPO_DIR_NAME).join(OBJECTS_DIR).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_enclosing_worktree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".texam/objects")).unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();

        let found = discover_worktree(&dir.path().join("a/b")).unwrap();
        assert_eq!(found, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn no_repository_above() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover_worktree(dir.path()),
            Err(RepoError::InvalidRepo(_))
        ));
    }
}
