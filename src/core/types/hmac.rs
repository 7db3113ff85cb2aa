//! `MacKey` - HMAC-SHA1 keys.
//!
//! Signing produces a bare 20-byte tag with no envelope header. The same
//! type authenticates symmetric ciphertexts inside [`SymmetricKey`].
//!
//! [`SymmetricKey`]: crate::core::types::SymmetricKey

use core::fmt::{self, Debug};

use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::core::error::{KeyError, KeyResult};
use crate::core::keytype::KeyType;
use crate::core::operations::id::{KeyId, KeyIdHasher};
use crate::core::record::{decode_web64, encode_web64, parse_record, write_record, MacKeyRecord};
use crate::core::types::{KeyIdentity, KeyRecord, SignKey, VerifyKey};

type HmacSha1 = Hmac<Sha1>;

/// Size of an HMAC-SHA1 tag in bytes.
pub const MAC_TAG_SIZE: usize = 20;

/// An HMAC-SHA1 key.
///
/// # Security
///
/// - Key material is zeroized on drop
/// - Debug output redacts the key
/// - Tag comparison is constant-time
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct MacKey {
    key: Vec<u8>,
}

impl MacKey {
    /// Creates a MAC key from raw bytes, checking the size against the
    /// `HMAC_SHA1` descriptor.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if the length is not accepted.
    pub fn from_bytes(key: Vec<u8>) -> KeyResult<Self> {
        // Wrapped before the check so a rejected key is zeroized on drop
        let key = Self { key };
        KeyType::HmacSha1.check_byte_len(key.key.len())?;
        Ok(key)
    }

    /// Generates a key of the default size.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::CryptoError` if the random source fails.
    pub fn generate() -> KeyResult<Self> {
        Self::generate_with_size(KeyType::HmacSha1.default_size())
    }

    /// Generates a key of `bits` bits from the OS random source.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` for an unaccepted size and
    /// `KeyError::CryptoError` if the random source fails.
    pub fn generate_with_size(bits: u32) -> KeyResult<Self> {
        KeyType::HmacSha1.check_size(bits)?;
        tracing::debug!(bits, "generating HMAC-SHA1 key");

        let mut key = vec![0u8; (bits / 8) as usize];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|_| KeyError::CryptoError)?;
        Ok(Self { key })
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Key size in bits.
    #[must_use]
    pub fn size(&self) -> u32 {
        (self.key.len() * 8) as u32
    }

    fn tag(&self, message: &[u8]) -> KeyResult<[u8; MAC_TAG_SIZE]> {
        let mut mac =
            <HmacSha1 as Mac>::new_from_slice(&self.key).map_err(|_| KeyError::CryptoError)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().into())
    }

    pub(crate) fn to_record_fields(&self) -> MacKeyRecord {
        MacKeyRecord {
            key: encode_web64(&self.key),
            size: self.size(),
        }
    }

    pub(crate) fn from_record_fields(record: &MacKeyRecord) -> KeyResult<Self> {
        KeyType::HmacSha1.check_size(record.size)?;
        let key = Self {
            key: decode_web64(&record.key)?,
        };
        if key.key.len() * 8 != record.size as usize {
            return Err(KeyError::InvalidKeySize);
        }
        Ok(key)
    }
}

impl KeyIdentity for MacKey {
    fn key_id(&self) -> KeyId {
        KeyIdHasher::new().update(&self.key).finish()
    }
}

impl VerifyKey for MacKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool> {
        if signature.len() != MAC_TAG_SIZE {
            return Ok(false);
        }
        let expected = self.tag(message)?;
        Ok(expected[..].ct_eq(signature).into())
    }
}

impl SignKey for MacKey {
    fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        Ok(self.tag(message)?.to_vec())
    }
}

impl KeyRecord for MacKey {
    const KEY_TYPE: KeyType = KeyType::HmacSha1;

    fn from_record(record: &str) -> KeyResult<Self> {
        Self::from_record_fields(&parse_record(record)?)
    }

    fn to_record(&self) -> KeyResult<String> {
        write_record(&self.to_record_fields())
    }
}

impl Debug for MacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacKey")
            .field("id", &self.key_id())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 2202 test case 2
    const RFC2202_KEY: &[u8] = b"Jefe";
    const RFC2202_DATA: &[u8] = b"what do ya want for nothing?";
    const RFC2202_TAG: [u8; 20] = [
        0xef, 0xfc, 0xdf, 0x6a, 0xe5, 0xeb, 0x2f, 0xa2, 0xd2, 0x74, 0x16, 0xd5, 0xf1, 0x84, 0xdf,
        0x9c, 0x25, 0x9a, 0x7c, 0x79,
    ];

    fn raw_key(key: &[u8]) -> MacKey {
        MacKey { key: key.to_vec() }
    }

    #[test]
    fn test_known_tag() -> KeyResult<()> {
        let key = raw_key(RFC2202_KEY);
        assert_eq!(key.sign(RFC2202_DATA)?, RFC2202_TAG);
        assert!(key.verify(RFC2202_DATA, &RFC2202_TAG)?);
        Ok(())
    }

    #[test]
    fn test_sign_verify_roundtrip() -> KeyResult<()> {
        let key = MacKey::generate()?;
        let tag = key.sign(b"message")?;
        assert_eq!(tag.len(), MAC_TAG_SIZE);
        assert!(key.verify(b"message", &tag)?);
        assert!(!key.verify(b"messagf", &tag)?);
        Ok(())
    }

    #[test]
    fn test_wrong_tag_length_is_false() -> KeyResult<()> {
        let key = MacKey::generate()?;
        let tag = key.sign(b"message")?;
        assert!(!key.verify(b"message", &tag[..19])?);
        assert!(!key.verify(b"message", &[])?);
        let mut long = tag.clone();
        long.push(0);
        assert!(!key.verify(b"message", &long)?);
        Ok(())
    }

    #[test]
    fn test_other_key_rejects() -> KeyResult<()> {
        let a = MacKey::generate()?;
        let b = MacKey::generate()?;
        let tag = a.sign(b"message")?;
        assert!(!b.verify(b"message", &tag)?);
        Ok(())
    }

    #[test]
    fn test_generate_sizes() -> KeyResult<()> {
        assert_eq!(MacKey::generate()?.as_bytes().len(), 32);
        assert_eq!(MacKey::generate_with_size(160)?.size(), 160);
        assert!(matches!(
            MacKey::generate_with_size(128),
            Err(KeyError::InvalidKeySize)
        ));
        Ok(())
    }

    #[test]
    fn test_from_bytes_size_gate() {
        assert!(MacKey::from_bytes(vec![0u8; 20]).is_ok());
        assert!(matches!(
            MacKey::from_bytes(vec![0u8; 21]),
            Err(KeyError::InvalidKeySize)
        ));
    }

    #[test]
    fn test_key_id_is_sha1_prefix() {
        // SHA-1("Jefe") = cb5551f4...
        let key = raw_key(RFC2202_KEY);
        assert_eq!(key.key_id().to_string(), "cb5551f4");
    }

    #[test]
    fn test_record_roundtrip() -> KeyResult<()> {
        let key = MacKey::generate()?;
        let parsed = MacKey::from_record(&key.to_record()?)?;
        assert_eq!(parsed.as_bytes(), key.as_bytes());
        assert_eq!(parsed.key_id(), key.key_id());
        Ok(())
    }

    #[test]
    fn test_record_size_mismatch() -> KeyResult<()> {
        let key = MacKey::generate_with_size(160)?;
        let mut fields = key.to_record_fields();
        fields.size = 256;
        assert!(matches!(
            MacKey::from_record(&write_record(&fields)?),
            Err(KeyError::InvalidKeySize)
        ));
        Ok(())
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = raw_key(&[0x5a; 20]);
        let debug_str = format!("{key:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("5a5a"));
    }
}
