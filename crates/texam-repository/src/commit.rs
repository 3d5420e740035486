use texam_object::Commit;

use crate::RepoError;

/// Who committed, where, and for which test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMetadata {
    pub author: String,
    pub host: String,
    pub test_id: Option<String>,
}

impl CommitMetadata {
    pub fn new(author: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            host: host.into(),
            test_id: None,
        }
    }

    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }

    /// Build the commit object for `tree`.
    ///
    /// Every value becomes one payload line, so none may be empty or span
    /// lines. A missing test id is an error only when `require_test_id`.
    pub(crate) fn to_commit(
        &self,
        tree: texam_hash::ObjectId,
        require_test_id: bool,
    ) -> Result<Commit, RepoError> {
        let author = single_line("author", &self.author)?;
        let host = single_line("host", &self.host)?;
        let test_id = match self.test_id.as_deref() {
            Some(test_id) => Some(single_line("test", test_id)?),
            None if require_test_id => return Err(RepoError::MissingMetadata("test")),
            None => None,
        };

        Ok(Commit {
            tree,
            author,
            test_id,
            host,
        })
    }
}

fn single_line(field: &'static str, value: &str) -> Result<String, RepoError> {
    if value.is_empty() {
        return Err(RepoError::MissingMetadata(field));
    }
    if value.contains(['\n', '\r']) {
        return Err(RepoError::InvalidMetadata { field });
    }
    Ok(value.to_string())
}
