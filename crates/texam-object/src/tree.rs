use bstr::{BStr, BString, ByteSlice};
use texam_hash::ObjectId;

use crate::{ObjectError, ObjectKind};

/// One line of a tree: `<kind> <id-hex> <name>`.
///
/// `kind` is [`ObjectKind::Blob`] for files and [`ObjectKind::Tree`] for
/// subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: ObjectKind,
    pub oid: ObjectId,
    pub name: BString,
}

impl TreeEntry {
    /// Build an entry, rejecting names the line format cannot carry.
    pub fn new(kind: ObjectKind, oid: ObjectId, name: impl Into<BString>) -> Result<Self, ObjectError> {
        let name = name.into();
        validate_name(&name)?;
        if kind == ObjectKind::Commit {
            return Err(ObjectError::InvalidName {
                name,
                reason: "tree entries reference blobs or trees only",
            });
        }
        Ok(Self { kind, oid, name })
    }

    pub fn is_tree(&self) -> bool {
        self.kind == ObjectKind::Tree
    }
}

fn validate_name(name: &[u8]) -> Result<(), ObjectError> {
    let reason = if name.is_empty() {
        "empty name"
    } else if name.contains(&b'\n') {
        "contains a newline"
    } else if name.contains(&b'/') {
        "contains a path separator"
    } else if name == b"." || name == b".." {
        "reserved name"
    } else {
        return Ok(());
    };
    Err(ObjectError::InvalidName {
        name: BString::from(name),
        reason,
    })
}

/// A directory listing.
///
/// The payload is one entry per line, newline-joined with no trailing
/// newline, entries sorted bytewise by name. An empty directory has an empty
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        if content.is_empty() {
            return Ok(Self { entries });
        }

        for (line_no, line) in content.split(|&b| b == b'\n').enumerate() {
            let bad = |reason: &str| ObjectError::InvalidTreeEntry {
                line: line_no + 1,
                reason: reason.into(),
            };

            let (kind, rest) = line
                .split_once_str(" ")
                .ok_or_else(|| bad("missing space after kind"))?;
            let kind = ObjectKind::from_bytes(kind).map_err(|_| bad("invalid kind"))?;

            let (hex, name) = rest
                .split_once_str(" ")
                .ok_or_else(|| bad("missing space after id"))?;
            let hex = std::str::from_utf8(hex).map_err(|_| bad("non-ASCII id"))?;
            let oid = ObjectId::from_hex(hex).map_err(|_| bad("invalid id"))?;

            entries.push(TreeEntry::new(kind, oid, name)?);
        }

        Ok(Self { entries })
    }

    /// Serialize in canonical (name-sorted) order.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = Vec::new();
        for (i, entry) in sorted.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(entry.kind.as_str().as_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.oid.to_hex().as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
        }
        out
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
