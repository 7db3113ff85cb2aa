//! Property-based tests for envelopes, packing and key IDs.

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

use std::sync::OnceLock;

use keyczar_core::core::operations::pack::{len_prefix_pack, len_prefix_unpack};
use keyczar_core::core::operations::padding::{pkcs5_pad, pkcs5_unpad};
use keyczar_core::{
    parse_header, DecryptKey, EncryptKey, KeyError, KeyIdentity, KeyRecord, MacKey, SignKey,
    SymmetricKey, VerifyKey, HEADER_LENGTH,
};
use proptest::prelude::*;

fn symmetric_key() -> &'static SymmetricKey {
    static KEY: OnceLock<SymmetricKey> = OnceLock::new();
    KEY.get_or_init(|| SymmetricKey::generate_with_sizes(256, 160).expect("generate"))
}

fn mac_key() -> &'static MacKey {
    static KEY: OnceLock<MacKey> = OnceLock::new();
    KEY.get_or_init(|| MacKey::generate().expect("generate"))
}

proptest! {
    /// Property: decrypt(encrypt(p)) == p, and the envelope names the key.
    #[test]
    fn test_symmetric_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..512)) {
        let key = symmetric_key();
        let ciphertext = key.encrypt(&plaintext).expect("encrypt");

        let padded_len = (plaintext.len() / 16 + 1) * 16;
        prop_assert_eq!(ciphertext.len(), HEADER_LENGTH + 16 + padded_len + 20);

        let (id, _) = parse_header(&ciphertext).expect("header");
        prop_assert_eq!(id, key.key_id());
        prop_assert_eq!(key.decrypt(&ciphertext).expect("decrypt"), plaintext);
    }

    /// Property: any single bit flip is caught by the MAC.
    #[test]
    fn test_symmetric_bit_flip_detected(
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = symmetric_key();
        let mut ciphertext = key.encrypt(&plaintext).expect("encrypt");
        let i = position.index(ciphertext.len());
        ciphertext[i] ^= 1 << bit;

        prop_assert!(matches!(key.decrypt(&ciphertext), Err(KeyError::InvalidSignature)));
    }

    /// Property: inputs below the minimum length never reach the MAC.
    #[test]
    fn test_short_input_rejected(input in prop::collection::vec(any::<u8>(), 0..41)) {
        prop_assert!(matches!(symmetric_key().decrypt(&input), Err(KeyError::ShortCiphertext)));
    }

    /// Property: arbitrary input never panics decryption.
    #[test]
    fn test_arbitrary_input_is_error(input in prop::collection::vec(any::<u8>(), 41..256)) {
        prop_assert!(symmetric_key().decrypt(&input).is_err());
    }

    /// Property: HMAC sign/verify round trip, and tags do not transfer
    /// between messages.
    #[test]
    fn test_mac_roundtrip(
        message in prop::collection::vec(any::<u8>(), 0..256),
        other in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let key = mac_key();
        let tag = key.sign(&message).expect("sign");
        prop_assert!(key.verify(&message, &tag).expect("verify"));
        if other != message {
            prop_assert!(!key.verify(&other, &tag).expect("verify"));
        }
    }

    /// Property: unpack(pack(buffers)) == buffers.
    #[test]
    fn test_pack_roundtrip(
        buffers in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..8),
    ) {
        let refs: Vec<&[u8]> = buffers.iter().map(Vec::as_slice).collect();
        let packed = len_prefix_pack(&refs).expect("pack");
        prop_assert_eq!(len_prefix_unpack(&packed).expect("unpack"), buffers);
    }

    /// Property: truncated packs are always rejected.
    #[test]
    fn test_pack_truncation_rejected(
        buffers in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..32), 1..6),
        cut in any::<prop::sample::Index>(),
    ) {
        let refs: Vec<&[u8]> = buffers.iter().map(Vec::as_slice).collect();
        let packed = len_prefix_pack(&refs).expect("pack");
        let end = cut.index(packed.len());
        prop_assert!(matches!(len_prefix_unpack(&packed[..end]), Err(KeyError::MalformedPack)));
    }

    /// Property: padding always produces whole blocks and strips cleanly.
    #[test]
    fn test_padding_roundtrip(data in prop::collection::vec(any::<u8>(), 0..100)) {
        let padded = pkcs5_pad(&data, 16);
        prop_assert_eq!(padded.len() % 16, 0);
        prop_assert!(padded.len() > data.len());
        prop_assert_eq!(pkcs5_unpad(&padded, 16).expect("unpad"), data.as_slice());
    }

    /// Property: key IDs depend only on key bytes.
    #[test]
    fn test_key_id_deterministic(bytes in prop::collection::vec(any::<u8>(), 32)) {
        let a = MacKey::from_bytes(bytes.clone()).expect("key");
        let b = MacKey::from_record(&a.to_record().expect("record")).expect("record");
        prop_assert_eq!(a.key_id(), b.key_id());
    }
}
