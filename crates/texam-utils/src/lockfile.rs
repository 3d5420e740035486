use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{LockError, UtilError};
use crate::Result;

const LOCK_SUFFIX: &str = ".lock";

/// Guard over `<path>.lock` used to replace a single file atomically.
///
/// The lock is taken with `create_new`, new contents are written into the
/// lock file, and [`commit`](LockFile::commit) fsyncs and renames it over
/// the target. Dropping an uncommitted guard removes the lock file and leaves
/// the target untouched, so readers only ever see the old or the new
/// contents.
pub struct LockFile {
    path: PathBuf,
    lock_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl LockFile {
    /// Take the lock for `path`.
    ///
    /// Fails with [`LockError::AlreadyLocked`] if `<path>.lock` exists.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = lock_path_for(&path);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => LockError::AlreadyLocked {
                    path: lock_path.clone(),
                },
                _ => LockError::Create {
                    path: lock_path.clone(),
                    source: e,
                },
            })?;

        Ok(Self {
            path,
            lock_path,
            file: Some(file),
            committed: false,
        })
    }

    /// Replace the contents of `path` with `contents` under the lock protocol.
    pub fn replace(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
        let mut lock = Self::acquire(path)?;
        lock.write_all(contents)?;
        lock.commit()
    }

    /// The file this lock protects.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.lock` file itself.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Flush, fsync and rename the lock file over the target.
    pub fn commit(mut self) -> Result<()> {
        let commit_err = |source: io::Error, path: &Path| {
            UtilError::Lock(LockError::Commit {
                path: path.to_path_buf(),
                source,
            })
        };

        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| commit_err(e, &self.lock_path))?;
            file.sync_all().map_err(|e| commit_err(e, &self.lock_path))?;
        }

        fs::rename(&self.lock_path, &self.path).map_err(|e| commit_err(e, &self.lock_path))?;
        self.committed = true;
        Ok(())
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

impl Write for LockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .flush()
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}
