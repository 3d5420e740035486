//! Short hex id resolution.
//!
//! Only the shard directory named by the first two characters is scanned, so
//! resolution cost is bounded by the shard size, not the store size.

use std::fs;
use std::io;

use texam_hash::hex::is_hex_digits;
use texam_hash::ObjectId;

use crate::{ObjectStore, StoreError};

/// Shortest prefix accepted by [`ObjectStore::resolve_prefix`].
pub const MIN_PREFIX_LEN: usize = 5;

impl ObjectStore {
    /// Resolve a hex prefix to the single stored id it starts.
    ///
    /// Prefixes shorter than [`MIN_PREFIX_LEN`], longer than 40 characters
    /// or containing non-hex characters are `NotFound`. Case is ignored.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ObjectId, StoreError> {
        self.ensure_exists()?;

        let not_found = || StoreError::NotFound(prefix.to_string());
        if prefix.len() < MIN_PREFIX_LEN
            || prefix.len() > ObjectId::HEX_LEN
            || !is_hex_digits(prefix)
        {
            return Err(not_found());
        }

        if prefix.len() == ObjectId::HEX_LEN {
            let oid = ObjectId::from_hex(prefix).map_err(|_| not_found())?;
            return if self.contains(&oid) {
                Ok(oid)
            } else {
                Err(not_found())
            };
        }

        let lower = prefix.to_ascii_lowercase();
        let shard = &lower[..ObjectId::SHARD_LEN];

        let entries = match fs::read_dir(self.objects_dir.join(shard)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.len() != ObjectId::HEX_LEN - ObjectId::SHARD_LEN {
                continue;
            }
            match ObjectId::from_hex(&format!("{shard}{name}")) {
                Ok(oid) if oid.starts_with_hex(&lower) => matches.push(oid),
                _ => {}
            }
        }

        match matches.len() {
            0 => Err(not_found()),
            1 => Ok(matches[0]),
            count => Err(StoreError::Ambiguous {
                prefix: prefix.to_string(),
                count,
            }),
        }
    }
}
