use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::HashError;

/// An object identifier: the SHA-1 digest of an object's header and payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ObjectId::LEN]);

impl ObjectId {
    /// Digest length in bytes.
    pub const LEN: usize = 20;
    /// Length of the hex representation.
    pub const HEX_LEN: usize = Self::LEN * 2;
    /// Length of the shard directory name.
    pub const SHARD_LEN: usize = 2;
    /// The all-zeros id.
    pub const NULL: Self = Self([0u8; Self::LEN]);

    /// Create an id from raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; Self::LEN] =
            bytes
                .try_into()
                .map_err(|_| HashError::InvalidHashLength {
                    expected: Self::LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Parse a full 40-character hex id (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let mut bytes = [0u8; Self::LEN];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// The first `len` hex characters, clamped to the full length.
    pub fn to_hex_short(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.min(Self::HEX_LEN));
        hex
    }

    /// Whether the hex form starts with `prefix` (compared case-insensitively).
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// Split into the shard directory name and the file name within it.
    pub fn shard(&self) -> (String, String) {
        let mut hex = self.to_hex();
        let rest = hex.split_off(Self::SHARD_LEN);
        (hex, rest)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex_short(8))
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HELLO_HEX: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    #[test]
    fn display_roundtrip() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert_eq!(oid.to_string(), HELLO_HEX);
        let parsed: ObjectId = oid.to_string().parse().unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn debug_shows_short_hash() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert_eq!(format!("{:?}", oid), "ObjectId(ce013625)");
    }

    #[test]
    fn uppercase_hex_parses_to_same_id() {
        let lower = ObjectId::from_hex(HELLO_HEX).unwrap();
        let upper = ObjectId::from_hex(&HELLO_HEX.to_ascii_uppercase()).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn ordering_follows_bytes() {
        let a = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }

    #[test]
    fn usable_as_map_key() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        let mut map = HashMap::new();
        map.insert(oid, "hello");
        assert_eq!(map.get(&oid), Some(&"hello"));
    }

    #[test]
    fn from_bytes_wrong_length() {
        let err = ObjectId::from_bytes(&[0; 10]).unwrap_err();
        assert!(matches!(err, HashError::InvalidHashLength { expected: 20, actual: 10 }));
    }

    #[test]
    fn short_hex_is_rejected() {
        let err = ObjectId::from_hex("ce013").unwrap_err();
        assert!(matches!(err, HashError::InvalidHexLength { .. }));
    }

    #[test]
    fn invalid_hex_chars() {
        let err = ObjectId::from_hex("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, HashError::InvalidHex { .. }));
    }

    #[test]
    fn starts_with_hex_prefix() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert!(oid.starts_with_hex("ce013"));
        assert!(oid.starts_with_hex("CE013"));
        assert!(!oid.starts_with_hex("abcde"));
    }

    #[test]
    fn shard_split() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        let (shard, rest) = oid.shard();
        assert_eq!(shard, "ce");
        assert_eq!(rest, &HELLO_HEX[2..]);
    }

    #[test]
    fn short_hex_clamps() {
        let oid = ObjectId::from_hex(HELLO_HEX).unwrap();
        assert_eq!(oid.to_hex_short(7), "ce01362");
        assert_eq!(oid.to_hex_short(100), HELLO_HEX);
    }
}
