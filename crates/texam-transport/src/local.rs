//! Local push: mirror the files into a directory, keeping their paths
//! relative to the push root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{PushReport, PushRequest, Transport, TransportError};

pub struct LocalTransport {
    dest: PathBuf,
}

impl LocalTransport {
    pub fn new(dest: impl AsRef<Path>) -> Self {
        Self {
            dest: dest.as_ref().to_path_buf(),
        }
    }
}

impl Transport for LocalTransport {
    fn push(&self, request: &PushRequest) -> Result<PushReport, TransportError> {
        let mut report = PushReport::default();
        for (src, name) in request.named_files()? {
            let target = self.dest.join(&name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            // Objects are read-only once written; the head file may change.
            if target.is_file() && name.starts_with("objects/") {
                debug!(file = %name, "already mirrored");
            } else {
                if target.exists() {
                    make_writable(&target)?;
                }
                report.bytes += fs::copy(src, &target)?;
            }
            report.files += 1;
        }

        info!(
            dest = %self.dest.display(),
            user = %request.credentials.username,
            files = report.files,
            "push mirrored"
        );
        Ok(report)
    }

    fn describe(&self) -> String {
        self.dest.display().to_string()
    }
}

fn make_writable(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}
