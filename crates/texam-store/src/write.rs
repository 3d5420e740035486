use std::fs;
use std::io::Write;

use flate2::write::ZlibEncoder;
use texam_hash::hasher::Hasher;
use texam_hash::ObjectId;
use texam_object::header;
use texam_object::{Object, ObjectKind};
use tracing::debug;

use crate::{ObjectStore, StoreError};

/// Outcome of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Written {
    pub oid: ObjectId,
    /// `false` when the object was already stored.
    pub created: bool,
}

impl ObjectStore {
    /// Store a decoded object. Returns its id.
    pub fn write(&self, obj: &Object) -> Result<ObjectId, StoreError> {
        self.write_raw(obj.kind(), &obj.serialize_content())
    }

    /// Store `payload` as an object of `kind`. Returns its id.
    ///
    /// Writing an id that is already stored is a no-op. New objects are
    /// compressed into a temp file in the objects directory and renamed into
    /// place without clobbering, so a reader never sees a partial file.
    pub fn write_raw(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, StoreError> {
        self.write_raw_status(kind, payload).map(|w| w.oid)
    }

    /// Like [`write_raw`](Self::write_raw), also reporting whether a new file
    /// was created.
    pub fn write_raw_status(
        &self,
        kind: ObjectKind,
        payload: &[u8],
    ) -> Result<Written, StoreError> {
        self.ensure_exists()?;

        let hdr = header::write_header(kind, payload.len());
        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()?
        };

        let final_path = self.object_path(&oid);
        if final_path.is_file() {
            debug!(%oid, %kind, "object already stored");
            return Ok(Written { oid, created: false });
        }

        if let Some(shard) = final_path.parent() {
            fs::create_dir_all(shard)?;
        }

        let mut tmp = tempfile::Builder::new()
            .prefix("tmp_obj_")
            .tempfile_in(&self.objects_dir)?;
        {
            let mut encoder = ZlibEncoder::new(&mut tmp, self.compression_level);
            encoder.write_all(&hdr)?;
            encoder.write_all(payload)?;
            encoder.finish()?;
        }
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o444))?;
        }

        match tmp.persist_noclobber(&final_path) {
            Ok(_) => {
                debug!(%oid, %kind, size = payload.len(), "wrote object");
                Ok(Written { oid, created: true })
            }
            // Another writer stored the same id first; the bytes are identical.
            Err(_) if final_path.is_file() => Ok(Written { oid, created: false }),
            Err(e) => Err(StoreError::Io(e.error)),
        }
    }
}
