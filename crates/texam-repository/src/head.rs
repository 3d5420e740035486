use std::fs;
use std::path::Path;

use texam_hash::ObjectId;
use texam_utils::lockfile::LockFile;

use crate::RepoError;

/// Read the head file: `None` when it is empty.
pub(crate) fn read_head(path: &Path) -> Result<Option<ObjectId>, RepoError> {
    let content = fs::read_to_string(path)?;
    let hex = content.trim();
    if hex.is_empty() {
        return Ok(None);
    }
    ObjectId::from_hex(hex)
        .map(Some)
        .map_err(|_| RepoError::CorruptHead(hex.to_string()))
}

/// Point the head file at `oid` via `HEAD.lock`.
pub(crate) fn write_head(path: &Path, oid: &ObjectId) -> Result<(), RepoError> {
    LockFile::replace(path, oid.to_hex().as_bytes())?;
    Ok(())
}
