//! `SymmetricKey` - AES-CBC with a bundled HMAC-SHA1 key.
//!
//! Ciphertext layout:
//!
//! ```text
//! header (5) || IV (16) || AES-CBC(PKCS#5(plaintext)) || HMAC-SHA1 tag (20)
//! ```
//!
//! The tag covers everything before it, header included. Decryption checks
//! the tag before touching the cipher, so padding errors are only reachable
//! with authentic ciphertexts.

use core::fmt::{self, Debug};
use core::mem;

use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::core::error::{KeyError, KeyResult};
use crate::core::header::{make_header, HEADER_LENGTH};
use crate::core::keytype::KeyType;
use crate::core::operations::id::{KeyId, KeyIdHasher};
use crate::core::operations::pack::{len_prefix_pack, len_prefix_unpack};
use crate::core::operations::padding::{pkcs5_pad, pkcs5_unpad};
use crate::core::record::{
    decode_web64, encode_web64, parse_record, write_record, SymmetricKeyRecord, CBC_MODE,
};
use crate::core::types::hmac::{MacKey, MAC_TAG_SIZE};
use crate::core::types::{DecryptKey, EncryptKey, KeyIdentity, KeyRecord, SignKey, VerifyKey};

/// AES block size in bytes (also the IV size).
pub const AES_BLOCK_SIZE: usize = 16;

/// Smallest input [`SymmetricKey::decrypt`] will consider.
pub const MIN_CIPHERTEXT_LENGTH: usize = HEADER_LENGTH + AES_BLOCK_SIZE + MAC_TAG_SIZE;

/// An AES key bundled with the HMAC-SHA1 key that authenticates its
/// ciphertexts.
///
/// # Security
///
/// - Key material is zeroized on drop
/// - Debug output redacts both keys
/// - MAC verification happens before decryption and is constant-time
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SymmetricKey {
    key: Vec<u8>,
    mac_key: MacKey,
}

impl SymmetricKey {
    /// Creates a symmetric key from an AES key and a MAC key.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if the AES key length is not accepted.
    pub fn new(key: Vec<u8>, mac_key: MacKey) -> KeyResult<Self> {
        let key = Self { key, mac_key };
        KeyType::Aes.check_byte_len(key.key.len())?;
        Ok(key)
    }

    /// Generates an AES key and MAC key of the default sizes.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::CryptoError` if the random source fails.
    pub fn generate() -> KeyResult<Self> {
        Self::generate_with_sizes(
            KeyType::Aes.default_size(),
            KeyType::HmacSha1.default_size(),
        )
    }

    /// Generates independent AES and MAC keys of the given bit sizes.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if either size is not accepted and
    /// `KeyError::CryptoError` if the random source fails.
    pub fn generate_with_sizes(aes_bits: u32, mac_bits: u32) -> KeyResult<Self> {
        KeyType::Aes.check_size(aes_bits)?;
        tracing::debug!(aes_bits, mac_bits, "generating AES key");

        let mac_key = MacKey::generate_with_size(mac_bits)?;
        let mut key = vec![0u8; (aes_bits / 8) as usize];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|_| KeyError::CryptoError)?;

        Ok(Self { key, mac_key })
    }

    /// Returns the raw AES key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Returns the bundled MAC key.
    #[must_use]
    pub const fn mac_key(&self) -> &MacKey {
        &self.mac_key
    }

    /// AES key size in bits.
    #[must_use]
    pub fn size(&self) -> u32 {
        (self.key.len() * 8) as u32
    }

    /// Packs the AES key and MAC key into one length-prefixed blob.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::MalformedPack` only if a key exceeds 4 GiB.
    pub fn packed_keys(&self) -> KeyResult<Vec<u8>> {
        len_prefix_pack(&[&self.key, self.mac_key.as_bytes()])
    }

    /// Rebuilds a key from [`packed_keys`](Self::packed_keys) output.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::MalformedPack` if the blob is not a valid pack,
    /// and `KeyError::InvalidKeySize` unless it holds exactly two keys of
    /// acceptable AES and HMAC sizes.
    pub fn from_packed_keys(packed: &[u8]) -> KeyResult<Self> {
        let mut keys = len_prefix_unpack(packed)?;
        if keys.len() != 2 {
            keys.zeroize();
            return Err(KeyError::InvalidKeySize);
        }

        let mac = keys.pop().unwrap_or_default();
        let mut aes = Zeroizing::new(keys.pop().unwrap_or_default());
        let mac_key = MacKey::from_bytes(mac)?;
        Self::new(mem::take(&mut *aes), mac_key)
    }
}

fn cbc_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> KeyResult<Vec<u8>> {
    let invalid = |_| KeyError::InvalidKeyLength;
    let out = match key.len() {
        16 => cbc::Encryptor::<aes::Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<NoPadding>(data),
        24 => cbc::Encryptor::<aes::Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<NoPadding>(data),
        32 => cbc::Encryptor::<aes::Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<NoPadding>(data),
        _ => return Err(KeyError::InvalidKeyLength),
    };
    Ok(out)
}

fn cbc_decrypt(key: &[u8], iv: &[u8], data: &[u8]) -> KeyResult<Vec<u8>> {
    let invalid = |_| KeyError::InvalidKeyLength;
    let out = match key.len() {
        16 => cbc::Decryptor::<aes::Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .decrypt_padded_vec_mut::<NoPadding>(data),
        24 => cbc::Decryptor::<aes::Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .decrypt_padded_vec_mut::<NoPadding>(data),
        32 => cbc::Decryptor::<aes::Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .decrypt_padded_vec_mut::<NoPadding>(data),
        _ => return Err(KeyError::InvalidKeyLength),
    };
    // Only fails on input that is not block aligned
    out.map_err(|_| KeyError::InvalidPadding)
}

impl KeyIdentity for SymmetricKey {
    fn key_id(&self) -> KeyId {
        KeyIdHasher::new()
            .update_prefixed(&self.key)
            .update(self.mac_key.as_bytes())
            .finish()
    }
}

impl EncryptKey for SymmetricKey {
    fn encrypt(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        let mut padded = pkcs5_pad(plaintext, AES_BLOCK_SIZE);

        let mut iv = [0u8; AES_BLOCK_SIZE];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|_| KeyError::CryptoError)?;

        let ciphertext = cbc_encrypt(&self.key, &iv, &padded);
        padded.zeroize();
        let ciphertext = ciphertext?;

        let mut message =
            Vec::with_capacity(HEADER_LENGTH + AES_BLOCK_SIZE + ciphertext.len() + MAC_TAG_SIZE);
        message.extend_from_slice(&make_header(&self.key_id()));
        message.extend_from_slice(&iv);
        message.extend_from_slice(&ciphertext);

        let tag = self.mac_key.sign(&message)?;
        message.extend_from_slice(&tag);

        Ok(message)
    }
}

impl DecryptKey for SymmetricKey {
    fn decrypt(&self, ciphertext: &[u8]) -> KeyResult<Vec<u8>> {
        if ciphertext.len() < MIN_CIPHERTEXT_LENGTH {
            return Err(KeyError::ShortCiphertext);
        }

        let (message, tag) = ciphertext.split_at(ciphertext.len() - MAC_TAG_SIZE);
        if !self.mac_key.verify(message, tag)? {
            tracing::trace!("symmetric ciphertext failed MAC verification");
            return Err(KeyError::InvalidSignature);
        }

        let (iv, body) = message[HEADER_LENGTH..].split_at(AES_BLOCK_SIZE);
        let mut padded = cbc_decrypt(&self.key, iv, body)?;
        let plaintext = pkcs5_unpad(&padded, AES_BLOCK_SIZE).map(<[u8]>::to_vec);
        padded.zeroize();
        plaintext
    }
}

impl KeyRecord for SymmetricKey {
    const KEY_TYPE: KeyType = KeyType::Aes;

    fn from_record(record: &str) -> KeyResult<Self> {
        let record: SymmetricKeyRecord = parse_record(record)?;

        KeyType::Aes.check_size(record.size)?;
        if record.mode != CBC_MODE {
            return Err(KeyError::UnsupportedMode(record.mode));
        }

        let mac_key = MacKey::from_record_fields(&record.mac_key)?;
        let key = Self {
            key: decode_web64(&record.key)?,
            mac_key,
        };
        if key.key.len() * 8 != record.size as usize {
            return Err(KeyError::InvalidKeySize);
        }

        Ok(key)
    }

    fn to_record(&self) -> KeyResult<String> {
        write_record(&SymmetricKeyRecord {
            key: encode_web64(&self.key),
            size: self.size(),
            mac_key: self.mac_key.to_record_fields(),
            mode: CBC_MODE.to_string(),
        })
    }
}

impl Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("id", &self.key_id())
            .field("size", &self.size())
            .field("key", &"[REDACTED]")
            .finish()
    }
}
