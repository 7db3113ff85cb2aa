//! Key material types.
//!
//! Six concrete key types, one per [`KeyType`]:
//!
//! - [`SymmetricKey`] - AES-CBC with a bundled HMAC key (`AES`)
//! - [`MacKey`] - HMAC-SHA1 (`HMAC_SHA1`)
//! - [`DsaPrivateKey`] / [`DsaPublicKey`] - DSA over SHA-1, feature `dsa`
//! - [`RsaPrivateKey`] / [`RsaPublicKey`] - RSA PKCS#1 v1.5 and OAEP, feature `rsa`
//!
//! What a key can do is expressed through capability traits. Public keys only
//! implement the read-only half ([`VerifyKey`], [`EncryptKey`]); private keys
//! add [`SignKey`] or [`DecryptKey`] on top.
//!
//! [`KeyMaterial`] holds any of the six when the type is only known at run
//! time.

mod aes;
#[cfg(feature = "dsa")]
mod dsa;
mod hmac;
#[cfg(feature = "rsa")]
mod rsa;

pub use self::aes::{SymmetricKey, AES_BLOCK_SIZE, MIN_CIPHERTEXT_LENGTH};
#[cfg(feature = "dsa")]
pub use self::dsa::{DsaPrivateKey, DsaPublicKey};
pub use self::hmac::{MacKey, MAC_TAG_SIZE};
#[cfg(feature = "rsa")]
pub use self::rsa::{RsaPrivateKey, RsaPublicKey};

use crate::core::error::{KeyError, KeyResult};
use crate::core::keytype::KeyType;
use crate::core::operations::id::KeyId;

/// A key with a stable 4-byte identifier.
pub trait KeyIdentity {
    /// Returns the key's identifier, derived from its public material.
    fn key_id(&self) -> KeyId;
}

/// A key that can produce envelopes.
pub trait EncryptKey: KeyIdentity {
    /// Encrypts `plaintext` into a headered ciphertext.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying primitive fails.
    fn encrypt(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>>;
}

/// A key that can open envelopes.
pub trait DecryptKey: EncryptKey {
    /// Decrypts a headered ciphertext.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is short, fails authentication or is
    /// otherwise malformed.
    fn decrypt(&self, ciphertext: &[u8]) -> KeyResult<Vec<u8>>;
}

/// A key that can check signatures.
pub trait VerifyKey: KeyIdentity {
    /// Returns whether `signature` is valid for `message`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the signature cannot be decoded at all.
    fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool>;
}

/// A key that can produce signatures.
pub trait SignKey: VerifyKey {
    /// Signs `message`. The result carries no header.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying primitive fails.
    fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>>;
}

/// A key that loads from and exports to its JSON record.
pub trait KeyRecord: Sized {
    /// The key type this record describes.
    const KEY_TYPE: KeyType;

    /// Parses and validates a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is malformed, declares an unaccepted
    /// size, or describes inconsistent key material.
    fn from_record(record: &str) -> KeyResult<Self>;

    /// Serializes the key in the same schema `from_record` accepts.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidRecord` if serialization fails.
    fn to_record(&self) -> KeyResult<String>;
}

/// Key material of any supported type.
#[derive(Clone, Debug)]
pub enum KeyMaterial {
    /// AES-CBC with an HMAC key.
    Symmetric(SymmetricKey),
    /// HMAC-SHA1.
    Mac(MacKey),
    /// DSA signing key.
    #[cfg(feature = "dsa")]
    DsaPrivate(DsaPrivateKey),
    /// DSA verification key.
    #[cfg(feature = "dsa")]
    DsaPublic(DsaPublicKey),
    /// RSA signing and decryption key.
    #[cfg(feature = "rsa")]
    RsaPrivate(RsaPrivateKey),
    /// RSA verification and encryption key.
    #[cfg(feature = "rsa")]
    RsaPublic(RsaPublicKey),
}

impl KeyMaterial {
    /// Parses a record of the given type.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::UnsupportedKeyType` if the type's feature is
    /// disabled, and any error of the concrete type's `from_record`.
    pub fn from_record(key_type: KeyType, record: &str) -> KeyResult<Self> {
        match key_type {
            KeyType::Aes => SymmetricKey::from_record(record).map(Self::Symmetric),
            KeyType::HmacSha1 => MacKey::from_record(record).map(Self::Mac),
            #[cfg(feature = "dsa")]
            KeyType::DsaPriv => DsaPrivateKey::from_record(record).map(Self::DsaPrivate),
            #[cfg(feature = "dsa")]
            KeyType::DsaPub => DsaPublicKey::from_record(record).map(Self::DsaPublic),
            #[cfg(feature = "rsa")]
            KeyType::RsaPriv => RsaPrivateKey::from_record(record).map(Self::RsaPrivate),
            #[cfg(feature = "rsa")]
            KeyType::RsaPub => RsaPublicKey::from_record(record).map(Self::RsaPublic),
            #[allow(unreachable_patterns)]
            other => Err(KeyError::UnsupportedKeyType(other.to_string())),
        }
    }

    /// Serializes the key in its type's record schema.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidRecord` if serialization fails.
    pub fn to_record(&self) -> KeyResult<String> {
        match self {
            Self::Symmetric(key) => key.to_record(),
            Self::Mac(key) => key.to_record(),
            #[cfg(feature = "dsa")]
            Self::DsaPrivate(key) => key.to_record(),
            #[cfg(feature = "dsa")]
            Self::DsaPublic(key) => key.to_record(),
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(key) => key.to_record(),
            #[cfg(feature = "rsa")]
            Self::RsaPublic(key) => key.to_record(),
        }
    }

    /// The key type of the held material.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Symmetric(_) => KeyType::Aes,
            Self::Mac(_) => KeyType::HmacSha1,
            #[cfg(feature = "dsa")]
            Self::DsaPrivate(_) => KeyType::DsaPriv,
            #[cfg(feature = "dsa")]
            Self::DsaPublic(_) => KeyType::DsaPub,
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(_) => KeyType::RsaPriv,
            #[cfg(feature = "rsa")]
            Self::RsaPublic(_) => KeyType::RsaPub,
        }
    }

    /// The key as a signer, if it can sign.
    #[must_use]
    pub fn as_signer(&self) -> Option<&dyn SignKey> {
        match self {
            Self::Mac(key) => Some(key),
            #[cfg(feature = "dsa")]
            Self::DsaPrivate(key) => Some(key),
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(key) => Some(key),
            _ => None,
        }
    }

    /// The key as a verifier, if it can verify.
    #[must_use]
    pub fn as_verifier(&self) -> Option<&dyn VerifyKey> {
        match self {
            Self::Symmetric(_) => None,
            Self::Mac(key) => Some(key),
            #[cfg(feature = "dsa")]
            Self::DsaPrivate(key) => Some(key),
            #[cfg(feature = "dsa")]
            Self::DsaPublic(key) => Some(key),
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(key) => Some(key),
            #[cfg(feature = "rsa")]
            Self::RsaPublic(key) => Some(key),
        }
    }

    /// The key as an encrypter, if it can encrypt.
    #[must_use]
    pub fn as_encrypter(&self) -> Option<&dyn EncryptKey> {
        match self {
            Self::Symmetric(key) => Some(key),
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(key) => Some(key),
            #[cfg(feature = "rsa")]
            Self::RsaPublic(key) => Some(key),
            _ => None,
        }
    }

    /// The key as a decrypter, if it can decrypt.
    #[must_use]
    pub fn as_decrypter(&self) -> Option<&dyn DecryptKey> {
        match self {
            Self::Symmetric(key) => Some(key),
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(key) => Some(key),
            _ => None,
        }
    }
}

impl KeyIdentity for KeyMaterial {
    fn key_id(&self) -> KeyId {
        match self {
            Self::Symmetric(key) => key.key_id(),
            Self::Mac(key) => key.key_id(),
            #[cfg(feature = "dsa")]
            Self::DsaPrivate(key) => key.key_id(),
            #[cfg(feature = "dsa")]
            Self::DsaPublic(key) => key.key_id(),
            #[cfg(feature = "rsa")]
            Self::RsaPrivate(key) => key.key_id(),
            #[cfg(feature = "rsa")]
            Self::RsaPublic(key) => key.key_id(),
        }
    }
}

impl From<SymmetricKey> for KeyMaterial {
    fn from(key: SymmetricKey) -> Self {
        Self::Symmetric(key)
    }
}

impl From<MacKey> for KeyMaterial {
    fn from(key: MacKey) -> Self {
        Self::Mac(key)
    }
}
