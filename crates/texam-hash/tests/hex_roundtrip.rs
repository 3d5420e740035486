use proptest::prelude::*;
use texam_hash::hasher::Hasher;
use texam_hash::hex::{hex_decode, hex_to_string, is_hex_digits};
use texam_hash::ObjectId;

proptest! {
    #[test]
    fn hex_encode_decode_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let hex = hex_to_string(&bytes);
        prop_assert_eq!(hex.len(), bytes.len() * 2);
        prop_assert!(is_hex_digits(&hex));
        let mut decoded = vec![0u8; bytes.len()];
        hex_decode(&hex, &mut decoded).unwrap();
        prop_assert_eq!(&decoded, &bytes);
    }

    #[test]
    fn oid_hex_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 20..=20)) {
        let oid = ObjectId::from_bytes(&bytes).unwrap();
        let parsed: ObjectId = oid.to_hex().parse().unwrap();
        prop_assert_eq!(oid, parsed);
    }

    #[test]
    fn hashing_is_deterministic(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
        let a = Hasher::hash_object("blob", &payload).unwrap();
        let b = Hasher::hash_object("blob", &payload).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn single_byte_change_changes_id(
        payload in proptest::collection::vec(any::<u8>(), 1..256),
        idx in any::<proptest::sample::Index>(),
    ) {
        let mut flipped = payload.clone();
        let i = idx.index(flipped.len());
        flipped[i] ^= 0x01;
        let a = Hasher::hash_object("blob", &payload).unwrap();
        let b = Hasher::hash_object("blob", &flipped).unwrap();
        prop_assert_ne!(a, b);
    }
}
