use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bstr::{BString, ByteSlice};
use texam_hash::ObjectId;
use texam_object::{ObjectKind, Tree, TreeEntry};
use texam_store::ObjectStore;
use tracing::{debug, info};

use crate::graph::{Child, ChildKind, SnapshotGraph};
use crate::{Result, SnapshotError};

/// Counters gathered while writing a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub blobs_written: usize,
    pub blobs_reused: usize,
    pub trees_written: usize,
    pub trees_reused: usize,
    /// Total size of all file contents, stored or not.
    pub bytes: u64,
}

/// Build the graph for `root` and write it. Returns the root tree id.
pub fn snapshot(store: &ObjectStore, root: impl AsRef<Path>) -> Result<ObjectId> {
    let graph = SnapshotGraph::build(root)?;
    write_tree(store, &graph)
}

/// Write one tree per directory of `graph`, children first. Returns the id
/// of the root tree.
pub fn write_tree(store: &ObjectStore, graph: &SnapshotGraph) -> Result<ObjectId> {
    write_tree_with_stats(store, graph).map(|(oid, _)| oid)
}

pub fn write_tree_with_stats(
    store: &ObjectStore,
    graph: &SnapshotGraph,
) -> Result<(ObjectId, SnapshotStats)> {
    let mut stats = SnapshotStats::default();
    let mut tree_ids: HashMap<&Path, ObjectId> = HashMap::new();
    debug!(
        root = %graph.root().display(),
        directories = graph.directory_count(),
        files = graph.file_count(),
        "writing snapshot"
    );

    for dir in graph.directories() {
        let children = graph
            .children(dir)
            .ok_or_else(|| SnapshotError::InternalInvariant(dir.to_path_buf()))?;

        let mut tree = Tree::new();
        for child in children {
            let (kind, oid) = match child.kind {
                ChildKind::File => (ObjectKind::Blob, write_blob(store, child, &mut stats)?),
                ChildKind::Dir => {
                    let oid = tree_ids
                        .get(child.path.as_path())
                        .copied()
                        .ok_or_else(|| SnapshotError::InternalInvariant(child.path.clone()))?;
                    (ObjectKind::Tree, oid)
                }
            };
            let entry = TreeEntry::new(kind, oid, entry_name(child)?).map_err(|source| {
                SnapshotError::InvalidName {
                    path: child.path.clone(),
                    source,
                }
            })?;
            tree.push(entry);
        }
        tree.sort();

        let written = store.write_raw_status(ObjectKind::Tree, &tree.serialize_content())?;
        if written.created {
            stats.trees_written += 1;
        } else {
            stats.trees_reused += 1;
        }
        debug!(dir = %dir.display(), oid = %written.oid, entries = tree.len(), "wrote tree");
        tree_ids.insert(dir, written.oid);
    }

    let root = graph.root();
    let root_id = tree_ids
        .get(root)
        .copied()
        .ok_or_else(|| SnapshotError::InternalInvariant(root.to_path_buf()))?;

    info!(
        root = %root_id,
        blobs_written = stats.blobs_written,
        blobs_reused = stats.blobs_reused,
        trees = stats.trees_written + stats.trees_reused,
        bytes = stats.bytes,
        "snapshot written"
    );
    Ok((root_id, stats))
}

fn write_blob(store: &ObjectStore, child: &Child, stats: &mut SnapshotStats) -> Result<ObjectId> {
    let data = fs::read(&child.path)?;
    stats.bytes += data.len() as u64;
    let written = store.write_raw_status(ObjectKind::Blob, &data)?;
    if written.created {
        stats.blobs_written += 1;
    } else {
        stats.blobs_reused += 1;
    }
    Ok(written.oid)
}

fn entry_name(child: &Child) -> Result<BString> {
    let name = child.name();
    <[u8]>::from_os_str(name)
        .map(BString::from)
        .ok_or_else(|| SnapshotError::InvalidName {
            path: child.path.clone(),
            source: texam_object::ObjectError::InvalidName {
                name: BString::from(name.to_string_lossy().as_bytes()),
                reason: "not representable as bytes on this platform",
            },
        })
}
