use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use texam_hash::hasher::Hasher;
use texam_hash::ObjectId;
use texam_object::header;
use texam_object::{Blob, Commit, Object, ObjectKind, Tree};

use crate::{ObjectStore, StoreError};

/// Upper bound on a stored header (`"commit <len>\0"` is well under this).
const MAX_HEADER_LEN: usize = 64;

impl ObjectStore {
    /// Read and decode the object with `oid`.
    ///
    /// The inflated bytes are re-hashed and must reproduce `oid`, so a
    /// truncated or damaged file fails with [`StoreError::Corrupt`] instead of
    /// yielding partial data.
    pub fn read(&self, oid: &ObjectId) -> Result<Object, StoreError> {
        let raw = self.read_verified(oid)?;
        Object::parse(&raw).map_err(|e| StoreError::corrupt(oid, e))
    }

    /// Resolve `prefix` (≥ [`MIN_PREFIX_LEN`](crate::MIN_PREFIX_LEN) hex
    /// characters) and read the object it names.
    pub fn read_prefix(&self, prefix: &str) -> Result<(ObjectId, Object), StoreError> {
        let oid = self.resolve_prefix(prefix)?;
        let obj = self.read(&oid)?;
        Ok((oid, obj))
    }

    /// The payload of the object with `oid`, header stripped, exactly as it
    /// was written. The payload is not decoded, so any bytes accepted by
    /// [`write_raw`](Self::write_raw) read back unchanged.
    pub fn read_bytes(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        let mut raw = self.read_verified(oid)?;
        let (_, len, header_len) =
            header::parse_header(&raw).map_err(|e| StoreError::corrupt(oid, e))?;
        if raw.len() - header_len != len {
            return Err(StoreError::corrupt(
                oid,
                format_args!("header declares {len} bytes, found {}", raw.len() - header_len),
            ));
        }
        raw.drain(..header_len);
        Ok(raw)
    }

    /// Kind and payload length, inflating only as far as the header.
    pub fn read_header(&self, oid: &ObjectId) -> Result<(ObjectKind, usize), StoreError> {
        let compressed = self.read_compressed(oid)?;

        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut buf = [0u8; MAX_HEADER_LEN];
        let mut filled = 0;

        while !buf[..filled].contains(&0) {
            if filled == buf.len() {
                return Err(StoreError::corrupt(oid, "header exceeds 64 bytes"));
            }
            let n = decoder
                .read(&mut buf[filled..])
                .map_err(|e| StoreError::corrupt(oid, e))?;
            if n == 0 {
                return Err(StoreError::corrupt(oid, "unexpected end of header"));
            }
            filled += n;
        }

        let (kind, len, _) =
            header::parse_header(&buf[..filled]).map_err(|e| StoreError::corrupt(oid, e))?;
        Ok((kind, len))
    }

    pub fn read_blob(&self, oid: &ObjectId) -> Result<Blob, StoreError> {
        match self.read(oid)? {
            Object::Blob(blob) => Ok(blob),
            other => Err(mismatch(oid, ObjectKind::Blob, &other)),
        }
    }

    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree, StoreError> {
        match self.read(oid)? {
            Object::Tree(tree) => Ok(tree),
            other => Err(mismatch(oid, ObjectKind::Tree, &other)),
        }
    }

    pub fn read_commit(&self, oid: &ObjectId) -> Result<Commit, StoreError> {
        match self.read(oid)? {
            Object::Commit(commit) => Ok(commit),
            other => Err(mismatch(oid, ObjectKind::Commit, &other)),
        }
    }

    fn read_compressed(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        self.ensure_exists()?;
        match fs::read(self.object_path(oid)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(oid.to_hex()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Inflated header and payload, checked against `oid`.
    fn read_verified(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        let raw = self.read_inflated(oid)?;
        let actual = Hasher::digest(&raw)?;
        if actual != *oid {
            return Err(StoreError::corrupt(
                oid,
                format_args!("content hashes to {actual}"),
            ));
        }
        Ok(raw)
    }

    fn read_inflated(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        let compressed = self.read_compressed(oid)?;
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut raw = Vec::new();
        decoder
            .read_to_end(&mut raw)
            .map_err(|e| StoreError::corrupt(oid, e))?;
        Ok(raw)
    }
}

fn mismatch(oid: &ObjectId, expected: ObjectKind, found: &Object) -> StoreError {
    StoreError::KindMismatch {
        oid: *oid,
        expected,
        actual: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let objects = dir.path().join("objects");
        fs::create_dir(&objects).unwrap();
        (dir, ObjectStore::open(objects))
    }

    #[test]
    fn read_back_blob() {
        let (_dir, store) = store();
        let oid = store.write_raw(ObjectKind::Blob, b"hello").unwrap();
        assert_eq!(store.read_blob(&oid).unwrap().data, b"hello");
        assert_eq!(store.read_bytes(&oid).unwrap(), b"hello");
    }

    #[test]
    fn header_without_full_decode() {
        let (_dir, store) = store();
        let payload = vec![7u8; 100_000];
        let oid = store.write_raw(ObjectKind::Blob, &payload).unwrap();
        assert_eq!(store.read_header(&oid).unwrap(), (ObjectKind::Blob, 100_000));
    }

    #[test]
    fn missing_object_is_not_found() {
        let (_dir, store) = store();
        let oid = ObjectId::from_hex("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();
        assert!(matches!(store.read(&oid), Err(StoreError::NotFound(_))));
        assert!(matches!(store.read_header(&oid), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn typed_read_reports_kind_mismatch() {
        let (_dir, store) = store();
        let oid = store.write_raw(ObjectKind::Blob, b"not a commit").unwrap();
        match store.read_commit(&oid) {
            Err(StoreError::KindMismatch {
                expected: ObjectKind::Commit,
                actual: ObjectKind::Blob,
                ..
            }) => {}
            other => panic!("expected kind mismatch, got {other:?}"),
        }
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let (_dir, store) = store();
        let oid = store.write_raw(ObjectKind::Blob, b"payload").unwrap();
        let path = store.object_path(&oid);
        make_writable(&path);
        fs::write(&path, b"definitely not zlib").unwrap();
        assert!(matches!(store.read(&oid), Err(StoreError::Corrupt { .. })));
        assert!(matches!(store.read_header(&oid), Err(StoreError::Corrupt { .. })));
    }

    fn make_writable(path: &std::path::Path) {
        let mut perms = fs::metadata(path).unwrap().permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms).unwrap();
    }
}
