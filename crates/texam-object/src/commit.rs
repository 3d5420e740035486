use bstr::{BString, ByteSlice};
use texam_hash::ObjectId;

use crate::ObjectError;

/// A commit: the root tree of a snapshot plus who took it, where, and for
/// which test.
///
/// Payload, one `key value` line each in this order:
///
/// ```text
/// tree <id-hex>
/// author <author>
/// test <test-id>        (only when present)
/// host <host>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: ObjectId,
    pub author: String,
    pub test_id: Option<String>,
    pub host: String,
}

impl Commit {
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tree = None;
        let mut author = None;
        let mut test_id = None;
        let mut host = None;

        for line in content.lines() {
            let (key, value) = line
                .split_once_str(" ")
                .ok_or_else(|| ObjectError::InvalidCommitLine(BString::from(line)))?;
            let value = value
                .to_str()
                .map_err(|_| ObjectError::InvalidCommitLine(BString::from(line)))?;

            match key {
                b"tree" => tree = Some(ObjectId::from_hex(value)?),
                b"author" => author = Some(value.to_owned()),
                b"test" => test_id = Some(value.to_owned()),
                b"host" => host = Some(value.to_owned()),
                _ => return Err(ObjectError::InvalidCommitLine(BString::from(line))),
            }
        }

        Ok(Self {
            tree: tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?,
            author: author.ok_or(ObjectError::MissingCommitField { field: "author" })?,
            test_id,
            host: host.ok_or(ObjectError::MissingCommitField { field: "host" })?,
        })
    }

    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str("tree ");
        out.push_str(&self.tree.to_hex());
        out.push('\n');
        out.push_str("author ");
        out.push_str(&self.author);
        out.push('\n');
        if let Some(ref test_id) = self.test_id {
            out.push_str("test ");
            out.push_str(test_id);
            out.push('\n');
        }
        out.push_str("host ");
        out.push_str(&self.host);
        out.push('\n');
        out.into_bytes()
    }
}
