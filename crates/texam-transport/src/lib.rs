//! Push transports.
//!
//! A push uploads a list of files that live under one root directory (the
//! repository's `.texam`), each identified on the remote by its path
//! relative to that root, together with the user's credentials. Over
//! HTTP(S) this is one multipart POST; for `file://` URLs and plain paths
//! the files are copied into a mirror directory.

pub mod http;
pub mod local;
pub mod url;

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur during a push.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP error: {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{path} is not under {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Push URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
    File,
    /// Local path without scheme prefix.
    Local,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
            Scheme::File => write!(f, "file"),
            Scheme::Local => write!(f, "local"),
        }
    }
}

/// Parsed push URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub scheme: Scheme,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
}

impl std::fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scheme {
            Scheme::Local => write!(f, "{}", self.path),
            Scheme::File => write!(f, "file://{}", self.path),
            Scheme::Http | Scheme::Https => {
                write!(f, "{}://", self.scheme)?;
                if let Some(ref host) = self.host {
                    write!(f, "{host}")?;
                }
                if let Some(port) = self.port {
                    write!(f, ":{port}")?;
                }
                write!(f, "{}", self.path)
            }
        }
    }
}

/// Opaque credentials forwarded to the remote.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub test_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("test_id", &self.test_id)
            .finish()
    }
}

/// What to upload.
#[derive(Debug, Clone)]
pub struct PushRequest {
    /// Directory the remote names are relative to.
    pub root: PathBuf,
    /// Files to send, in order. Each must be under `root`.
    pub files: Vec<PathBuf>,
    pub credentials: Credentials,
}

impl PushRequest {
    /// Each file with its remote name: the path under `root` with `/`
    /// separators.
    pub fn named_files(&self) -> Result<Vec<(&Path, String)>, TransportError> {
        self.files
            .iter()
            .map(|file| {
                let rel = file
                    .strip_prefix(&self.root)
                    .map_err(|_| TransportError::OutsideRoot {
                        path: file.clone(),
                        root: self.root.clone(),
                    })?;
                let name = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                Ok((file.as_path(), name))
            })
            .collect()
    }
}

/// Summary of a completed push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    pub files: usize,
    pub bytes: u64,
}

/// A destination a transfer set can be pushed to.
pub trait Transport {
    fn push(&self, request: &PushRequest) -> Result<PushReport, TransportError>;

    /// Human-readable destination, for logs.
    fn describe(&self) -> String;
}

/// Pick a transport for `url`. `timeout` bounds each network request.
pub fn connect(url: &RemoteUrl, timeout: Duration) -> Result<Box<dyn Transport>, TransportError> {
    match url.scheme {
        Scheme::Http | Scheme::Https => Ok(Box::new(http::HttpTransport::new(url, timeout)?)),
        Scheme::File | Scheme::Local => Ok(Box::new(local::LocalTransport::new(&url.path))),
    }
}
