//! Snapshot behavior over real directory trees.

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use texam_hash::hasher::Hasher;
use texam_hash::ObjectId;
use texam_object::ObjectKind;
use texam_snapshot::snapshot;
use texam_store::ObjectStore;

fn setup() -> (tempfile::TempDir, ObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let objects = dir.path().join(".texam").join("objects");
    fs::create_dir_all(&objects).unwrap();
    let store = ObjectStore::open(objects);
    (dir, store)
}

fn write_file(root: &Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, data).unwrap();
}

#[test]
fn worked_example() {
    let (dir, store) = setup();
    let root = dir.path();
    write_file(root, "a.txt", b"hello\n");
    write_file(root, "sub/b.txt", b"world\n");

    let root_id = snapshot(&store, root).unwrap();

    let hello = ObjectId::from_hex("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();
    let world = Hasher::hash_object("blob", b"world\n").unwrap();
    let sub_payload = format!("blob {world} b.txt");
    let sub = Hasher::hash_object("tree", sub_payload.as_bytes()).unwrap();
    let root_payload = format!("blob {hello} a.txt\ntree {sub} sub");
    let expected = Hasher::hash_object("tree", root_payload.as_bytes()).unwrap();

    assert_eq!(root_id, expected);
    assert_eq!(store.read_bytes(&root_id).unwrap(), root_payload.as_bytes());
    // 2 blobs + 2 trees, nothing from .texam.
    assert_eq!(store.iter().unwrap().count(), 4);
}

#[test]
fn deep_leaf_change_reaches_root() {
    let (dir, store) = setup();
    let root = dir.path();
    write_file(root, "x/y/z/leaf.txt", b"v1");
    write_file(root, "top.txt", b"top");

    let before = snapshot(&store, root).unwrap();
    let x_before = store.read_tree(&before).unwrap().entries[1].oid;

    write_file(root, "x/y/z/leaf.txt", b"v2");
    let after = snapshot(&store, root).unwrap();
    let tree_after = store.read_tree(&after).unwrap();

    assert_ne!(before, after);
    assert_ne!(tree_after.entries[1].oid, x_before);
    // The untouched sibling keeps its blob.
    assert_eq!(
        tree_after.entries[0].oid,
        Hasher::hash_object("blob", b"top").unwrap()
    );
}

#[test]
fn identical_directories_share_a_tree() {
    let (dir, store) = setup();
    let root = dir.path();
    for sub in ["left", "right"] {
        write_file(root, &format!("{sub}/same.txt"), b"same");
        write_file(root, &format!("{sub}/nested/deeper.txt"), b"deep");
    }

    let root_id = snapshot(&store, root).unwrap();
    let tree = store.read_tree(&root_id).unwrap();
    assert_eq!(tree.entries[0].oid, tree.entries[1].oid);
    // root + one shared subtree + one shared nested tree + two blobs
    assert_eq!(store.iter().unwrap().count(), 5);
}

#[test]
fn store_metadata_never_appears() {
    let (dir, store) = setup();
    let root = dir.path();
    write_file(root, "answer.txt", b"42");
    fs::write(root.join(".texam").join("HEAD"), b"").unwrap();

    let root_id = snapshot(&store, root).unwrap();
    let tree = store.read_tree(&root_id).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.entries[0].name, "answer.txt");
}

#[test]
fn empty_subdirectory_is_an_empty_tree() {
    let (dir, store) = setup();
    fs::create_dir(dir.path().join("blank")).unwrap();

    let root_id = snapshot(&store, dir.path()).unwrap();
    let entry = store.read_tree(&root_id).unwrap().entries[0].clone();
    assert_eq!(entry.kind, ObjectKind::Tree);
    assert_eq!(entry.oid, Hasher::hash_object("tree", b"").unwrap());
}

fn file_set() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    proptest::collection::btree_map(
        "[a-d]{1,3}(/[a-d]{1,3}){0,2}\\.txt",
        proptest::collection::vec(any::<u8>(), 0..64),
        1..12,
    )
    .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// The same files written in a different order give the same root id.
    #[test]
    fn root_id_ignores_creation_order(files in file_set()) {
        let (first, store_a) = setup();
        for (rel, data) in &files {
            write_file(first.path(), rel, data);
        }
        let (second, store_b) = setup();
        for (rel, data) in files.iter().rev() {
            write_file(second.path(), rel, data);
        }

        let a = snapshot(&store_a, first.path()).unwrap();
        let b = snapshot(&store_b, second.path()).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(snapshot(&store_a, first.path()).unwrap(), a);
    }
}
