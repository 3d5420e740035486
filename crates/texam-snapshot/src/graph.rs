use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{Result, SnapshotError, STORE_DIR_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    File,
    Dir,
}

/// A file or subdirectory inside a snapshot directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub path: PathBuf,
    pub kind: ChildKind,
}

impl Child {
    pub fn name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == ChildKind::Dir
    }
}

/// Directory structure of a worktree, captured once per snapshot.
///
/// Every directory under the root (the root included) has a node listing
/// its regular files and subdirectories in name order. Symlinks and special
/// files are left out, as is the store directory directly under the root.
#[derive(Debug, Clone)]
pub struct SnapshotGraph {
    root: PathBuf,
    children: HashMap<PathBuf, Vec<Child>>,
    /// Directories, each listed after all of its descendants.
    post_order: Vec<PathBuf>,
}

impl SnapshotGraph {
    pub fn build(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SnapshotError::NotADirectory(root.to_path_buf()));
        }

        let mut children: HashMap<PathBuf, Vec<Child>> = HashMap::new();
        let mut pre_order = Vec::new();

        // Pre-order so the store directory can be pruned before descent;
        // reversing it afterwards puts every directory after its contents.
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_store_dir(e));

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                ChildKind::Dir
            } else if file_type.is_file() {
                ChildKind::File
            } else {
                warn!(path = %entry.path().display(), "skipping non-regular file");
                continue;
            };

            let path = entry.path().to_path_buf();
            if kind == ChildKind::Dir {
                children.entry(path.clone()).or_default();
                pre_order.push(path.clone());
            }

            if entry.depth() == 0 {
                continue;
            }
            let Some(parent) = path.parent() else {
                continue;
            };
            children
                .entry(parent.to_path_buf())
                .or_default()
                .push(Child { path: path.clone(), kind });
        }

        pre_order.reverse();
        debug!(
            root = %root.display(),
            directories = pre_order.len(),
            "built snapshot graph"
        );

        Ok(Self {
            root: root.to_path_buf(),
            children,
            post_order: pre_order,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories in an order where children precede their parent; the
    /// root is last.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.post_order.iter().map(PathBuf::as_path)
    }

    /// Children of `dir` in name order, or `None` if `dir` is not a node.
    pub fn children(&self, dir: &Path) -> Option<&[Child]> {
        self.children.get(dir).map(Vec::as_slice)
    }

    pub fn directory_count(&self) -> usize {
        self.post_order.len()
    }

    pub fn file_count(&self) -> usize {
        self.children
            .values()
            .flatten()
            .filter(|c| c.kind == ChildKind::File)
            .count()
    }
}

fn is_store_dir(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_type().is_dir() && entry.file_name() == STORE_DIR_NAME
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(children: &[Child]) -> Vec<String> {
        children
            .iter()
            .map(|c| c.name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn children_come_before_parents() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::create_dir_all(dir.path().join("z")).unwrap();

        let graph = SnapshotGraph::build(dir.path()).unwrap();
        let order: Vec<&Path> = graph.directories().collect();
        let pos = |p: &Path| order.iter().position(|o| *o == p).unwrap();

        assert_eq!(order.len(), 5);
        assert_eq!(*order.last().unwrap(), dir.path());
        assert!(pos(&dir.path().join("a/b/c")) < pos(&dir.path().join("a/b")));
        assert!(pos(&dir.path().join("a/b")) < pos(&dir.path().join("a")));
    }

    #[test]
    fn children_are_name_ordered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"").unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let graph = SnapshotGraph::build(dir.path()).unwrap();
        let root = graph.children(graph.root()).unwrap();
        assert_eq!(names(root), ["a.txt", "b.txt", "c"]);
        assert!(root[2].is_dir());
        assert_eq!(graph.file_count(), 2);
        assert_eq!(graph.directory_count(), 2);
    }

    #[test]
    fn store_dir_is_pruned_only_at_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".texam/objects")).unwrap();
        fs::create_dir_all(dir.path().join("sub/.texam")).unwrap();
        fs::write(dir.path().join("sub/.texam/notes"), b"kept").unwrap();

        let graph = SnapshotGraph::build(dir.path()).unwrap();
        assert_eq!(names(graph.children(graph.root()).unwrap()), ["sub"]);
        assert!(graph.children(&dir.path().join(".texam")).is_none());
        assert_eq!(
            names(graph.children(&dir.path().join("sub/.texam")).unwrap()),
            ["notes"]
        );
    }

    #[test]
    fn empty_directory_is_a_node() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let graph = SnapshotGraph::build(dir.path()).unwrap();
        assert_eq!(graph.children(&dir.path().join("empty")), Some(&[][..]));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let graph = SnapshotGraph::build(dir.path()).unwrap();
        assert_eq!(names(graph.children(graph.root()).unwrap()), ["real"]);
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"").unwrap();
        assert!(matches!(
            SnapshotGraph::build(&file),
            Err(SnapshotError::NotADirectory(_))
        ));
    }
}
