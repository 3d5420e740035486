/// A blob: raw file contents with no further structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn parse(content: &[u8]) -> Self {
        Self {
            data: content.to_vec(),
        }
    }

    pub fn serialize_content(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_keeps_bytes_verbatim() {
        let data = b"hello\0world\n";
        assert_eq!(Blob::parse(data).serialize_content(), data);
        assert!(Blob::parse(b"").data.is_empty());
    }
}
