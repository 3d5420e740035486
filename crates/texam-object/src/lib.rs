//! texam object model: blob, tree and commit codecs.
//!
//! Every stored object is `"<kind> <len>\0<payload>"`. The header is the
//! same for all three kinds; commit metadata lives in the payload as
//! `key value` lines rather than in the header.

mod blob;
mod commit;
pub mod header;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tree::{Tree, TreeEntry};

use bstr::BString;
use texam_hash::{HashError, ObjectId};

/// Errors produced by object encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object kind: {0}")]
    InvalidKind(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("truncated object: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("invalid tree entry on line {line}: {reason}")]
    InvalidTreeEntry { line: usize, reason: String },

    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName { name: BString, reason: &'static str },

    #[error("invalid commit: missing '{field}' field")]
    MissingCommitField { field: &'static str },

    #[error("invalid commit line: {0}")]
    InvalidCommitLine(BString),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The three kinds of stored objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            _ => Err(ObjectError::InvalidKind(BString::from(s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    /// Parse the full stored form (header + payload).
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let (kind, len, header_len) = header::parse_header(data)?;
        let payload = &data[header_len..];
        if payload.len() != len {
            return Err(ObjectError::Truncated {
                expected: len,
                actual: payload.len(),
            });
        }
        Self::parse_content(kind, payload)
    }

    /// Parse a payload of a known kind (no header).
    pub fn parse_content(kind: ObjectKind, content: &[u8]) -> Result<Self, ObjectError> {
        match kind {
            ObjectKind::Blob => Ok(Self::Blob(Blob::parse(content))),
            ObjectKind::Tree => Ok(Self::Tree(Tree::parse(content)?)),
            ObjectKind::Commit => Ok(Self::Commit(Commit::parse(content)?)),
        }
    }

    /// The full stored form (header + payload).
    pub fn serialize(&self) -> Vec<u8> {
        let content = self.serialize_content();
        let mut out = header::write_header(self.kind(), content.len());
        out.extend_from_slice(&content);
        out
    }

    /// The payload alone.
    pub fn serialize_content(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.serialize_content().to_vec(),
            Self::Tree(t) => t.serialize_content(),
            Self::Commit(c) => c.serialize_content(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
        }
    }

    /// The id this object is stored under.
    pub fn compute_oid(&self) -> Result<ObjectId, HashError> {
        texam_hash::hasher::Hasher::hash_object(self.kind().as_str(), &self.serialize_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_bytes() {
        assert_eq!(ObjectKind::from_bytes(b"blob").unwrap(), ObjectKind::Blob);
        assert_eq!(ObjectKind::from_bytes(b"tree").unwrap(), ObjectKind::Tree);
        assert_eq!(ObjectKind::from_bytes(b"commit").unwrap(), ObjectKind::Commit);
        assert!(ObjectKind::from_bytes(b"tag").is_err());
    }

    #[test]
    fn kind_display_and_parse() {
        assert_eq!(ObjectKind::Tree.to_string(), "tree");
        assert_eq!("commit".parse::<ObjectKind>().unwrap(), ObjectKind::Commit);
        assert!("none".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn parse_rejects_length_mismatch() {
        let err = Object::parse(b"blob 10\0short").unwrap_err();
        assert!(matches!(err, ObjectError::Truncated { expected: 10, actual: 5 }));
        assert!(Object::parse(b"blob 2\0toolong").is_err());
    }

    #[test]
    fn blob_oid_matches_git_framing() {
        let obj = Object::Blob(Blob::new(b"hello\n".to_vec()));
        assert_eq!(
            obj.compute_oid().unwrap().to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }
}
