use std::fs;
use std::path::{Path, PathBuf};

use texam_hash::hex::is_hex_digits;
use texam_hash::ObjectId;

use crate::{ObjectStore, StoreError};

/// Iterator over every stored object id, in ascending hex order.
///
/// Shard directories are listed up front; each shard is read only when the
/// iterator reaches it. Temp files and other non-object names are skipped.
pub struct ObjectIter {
    shards: Vec<(String, PathBuf)>,
    shard_index: usize,
    pending: std::vec::IntoIter<ObjectId>,
}

impl ObjectIter {
    fn new(objects_dir: &Path) -> Result<Self, StoreError> {
        let mut shards = Vec::new();
        for entry in fs::read_dir(objects_dir)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.len() == ObjectId::SHARD_LEN
                && is_hex_digits(&name)
                && entry.file_type()?.is_dir()
            {
                shards.push((name.to_ascii_lowercase(), entry.path()));
            }
        }
        shards.sort();

        Ok(Self {
            shards,
            shard_index: 0,
            pending: Vec::new().into_iter(),
        })
    }

    fn load_next_shard(&mut self) -> Result<bool, StoreError> {
        while let Some((prefix, path)) = self.shards.get(self.shard_index) {
            self.shard_index += 1;

            let mut oids = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry = entry?;
                let Ok(name) = entry.file_name().into_string() else {
                    continue;
                };
                if name.len() != ObjectId::HEX_LEN - ObjectId::SHARD_LEN || !is_hex_digits(&name) {
                    continue;
                }
                if let Ok(oid) = ObjectId::from_hex(&format!("{prefix}{name}")) {
                    oids.push(oid);
                }
            }

            if !oids.is_empty() {
                oids.sort();
                self.pending = oids.into_iter();
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Iterator for ObjectIter {
    type Item = Result<ObjectId, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(oid) = self.pending.next() {
                return Some(Ok(oid));
            }
            match self.load_next_shard() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl ObjectStore {
    /// Iterate over all stored object ids.
    pub fn iter(&self) -> Result<ObjectIter, StoreError> {
        self.ensure_exists()?;
        ObjectIter::new(&self.objects_dir)
    }
}
