use std::path::PathBuf;

use bstr::BString;
use texam_hash::{ObjectId, OidSet};
use texam_object::ObjectKind;
use texam_store::{ObjectStore, StoreError};
use tracing::debug;

use crate::WalkError;

/// One reachable object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem {
    pub oid: ObjectId,
    pub kind: ObjectKind,
    /// Slash-separated location inside the snapshot; empty for the commit
    /// and the root tree.
    pub path: BString,
}

/// Lazy depth-first walk from a commit.
///
/// Order: the commit, its root tree, then each tree's entries in stored
/// order, descending into a subtree before moving on to its next sibling.
/// An id reached a second time (a file or directory duplicated elsewhere in
/// the snapshot) is not yielded again, and its subtree is not re-read.
///
/// The walk stops after the first error.
pub struct ObjectWalk<'a> {
    store: &'a ObjectStore,
    commit: ObjectId,
    stack: Vec<WalkItem>,
    seen: OidSet,
    started: bool,
    done: bool,
}

impl<'a> ObjectWalk<'a> {
    pub fn new(store: &'a ObjectStore, commit: ObjectId) -> Self {
        Self {
            store,
            commit,
            stack: Vec::new(),
            seen: OidSet::new(),
            started: false,
            done: false,
        }
    }

    pub fn commit(&self) -> ObjectId {
        self.commit
    }

    /// Start over from the commit.
    pub fn restart(&mut self) {
        self.stack.clear();
        self.seen.clear();
        self.started = false;
        self.done = false;
    }

    fn start(&mut self) -> Result<WalkItem, WalkError> {
        let commit = match self.store.read_commit(&self.commit) {
            Ok(commit) => commit,
            Err(StoreError::KindMismatch { oid, .. }) => return Err(WalkError::NotACommit(oid)),
            Err(e) => return Err(e.into()),
        };
        debug!(commit = %self.commit, tree = %commit.tree, "starting object walk");

        self.seen.insert(self.commit);
        self.stack.push(WalkItem {
            oid: commit.tree,
            kind: ObjectKind::Tree,
            path: BString::default(),
        });
        Ok(WalkItem {
            oid: self.commit,
            kind: ObjectKind::Commit,
            path: BString::default(),
        })
    }

    fn step(&mut self) -> Result<Option<WalkItem>, WalkError> {
        while let Some(item) = self.stack.pop() {
            if !self.seen.insert(item.oid) {
                continue;
            }

            if item.kind == ObjectKind::Tree {
                let tree = self.store.read_tree(&item.oid)?;
                // Reversed so the first entry is popped first.
                for entry in tree.entries.iter().rev() {
                    if self.seen.contains(&entry.oid) {
                        continue;
                    }
                    let mut path = item.path.clone();
                    if !path.is_empty() {
                        path.push(b'/');
                    }
                    path.extend_from_slice(&entry.name);
                    self.stack.push(WalkItem {
                        oid: entry.oid,
                        kind: entry.kind,
                        path,
                    });
                }
            } else if !self.store.contains(&item.oid) {
                return Err(StoreError::NotFound(item.oid.to_hex()).into());
            }
            return Ok(Some(item));
        }
        Ok(None)
    }
}

impl Iterator for ObjectWalk<'_> {
    type Item = Result<WalkItem, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = if self.started {
            self.step()
        } else {
            self.started = true;
            self.start().map(Some)
        };

        match result {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Paths of every object file reachable from `commit`, in walk order.
pub fn objects_for(store: &ObjectStore, commit: ObjectId) -> Result<Vec<PathBuf>, WalkError> {
    ObjectWalk::new(store, commit)
        .map(|item| item.map(|item| store.object_path(&item.oid)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use texam_object::{Commit, Object, Tree, TreeEntry};

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        (dir, store)
    }

    fn commit_over(store: &ObjectStore, tree: ObjectId) -> ObjectId {
        store
            .write(&Object::Commit(Commit {
                tree,
                author: "s1".into(),
                test_id: None,
                host: "h".into(),
            }))
            .unwrap()
    }

    #[test]
    fn commit_then_tree_then_entries() {
        let (_dir, store) = store();
        let blob = store.write_raw(ObjectKind::Blob, b"content").unwrap();
        let mut tree = Tree::new();
        tree.push(TreeEntry::new(ObjectKind::Blob, blob, "f").unwrap());
        let tree_oid = store.write(&Object::Tree(tree)).unwrap();
        let commit = commit_over(&store, tree_oid);

        let items: Vec<WalkItem> = ObjectWalk::new(&store, commit)
            .collect::<Result<_, _>>()
            .unwrap();
        let kinds: Vec<ObjectKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, [ObjectKind::Commit, ObjectKind::Tree, ObjectKind::Blob]);
        assert_eq!(items[2].path, "f");
    }

    #[test]
    fn blob_is_not_a_commit() {
        let (_dir, store) = store();
        let blob = store.write_raw(ObjectKind::Blob, b"x").unwrap();
        let mut walk = ObjectWalk::new(&store, blob);
        assert!(matches!(walk.next(), Some(Err(WalkError::NotACommit(oid))) if oid == blob));
        assert!(walk.next().is_none());
    }

    #[test]
    fn restart_replays_the_walk() {
        let (_dir, store) = store();
        let tree_oid = store.write(&Object::Tree(Tree::new())).unwrap();
        let commit = commit_over(&store, tree_oid);

        let mut walk = ObjectWalk::new(&store, commit);
        let first: Vec<_> = walk.by_ref().map(Result::unwrap).collect();
        assert!(walk.next().is_none());
        walk.restart();
        let second: Vec<_> = walk.map(Result::unwrap).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
