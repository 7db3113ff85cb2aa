//! Key material for a Keyczar-style cryptographic toolkit.
//!
//! This crate provides the typed key layer underneath a Keyczar key set:
//! concrete key types, their serialized records, the envelope format used by
//! their ciphertexts, and a loader that reads every version of a key set
//! from a pluggable source.
//!
//! # Quick Start
//!
//! ```rust
//! use keyczar_core::{DecryptKey, EncryptKey, KeyIdentity, KeyRecord, SymmetricKey};
//!
//! # fn main() -> keyczar_core::KeyResult<()> {
//! let key = SymmetricKey::generate()?;
//!
//! let ciphertext = key.encrypt(b"hello world")?;
//! assert_eq!(&ciphertext[1..5], key.key_id().as_bytes());
//! assert_eq!(key.decrypt(&ciphertext)?, b"hello world");
//!
//! // Records round-trip through the same JSON schema they load from
//! let restored = SymmetricKey::from_record(&key.to_record()?)?;
//! assert_eq!(restored.key_id(), key.key_id());
//! # Ok(())
//! # }
//! ```
//!
//! # Key Types
//!
//! | Type | Record name | Capabilities |
//! |------|-------------|--------------|
//! | [`SymmetricKey`] | `AES` | encrypt, decrypt |
//! | [`MacKey`] | `HMAC_SHA1` | sign, verify |
//! | `DsaPrivateKey` | `DSA_PRIV` | sign, verify |
//! | `DsaPublicKey` | `DSA_PUB` | verify |
//! | `RsaPrivateKey` | `RSA_PRIV` | sign, verify, encrypt, decrypt |
//! | `RsaPublicKey` | `RSA_PUB` | verify, encrypt |
//!
//! # Envelope Format
//!
//! Symmetric and RSA ciphertexts start with a 5-byte header: a zero format
//! byte followed by the 4-byte [`KeyId`] of the key that produced them.
//! Signatures carry no header.
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! keyczar-core = "0.1"  # AES, HMAC, DSA and RSA (default)
//! keyczar-core = { version = "0.1", default-features = false }  # AES and HMAC only
//! keyczar-core = { version = "0.1", default-features = false, features = ["rsa"] }
//! ```
//!
//! # Security
//!
//! - Symmetric key material is zeroized on drop
//! - Debug output redacts sensitive key material
//! - MAC tags are compared in constant time, before any decryption
//! - RSA CRT parameters are recomputed and checked on load
//! - RSA decryption is blinded, but the `rsa` crate is still subject to
//!   RUSTSEC-2023-0071 (Marvin Attack); disable the `rsa` feature if you do
//!   not need RSA keys
//! - No unsafe code
//!
//! # Modules
//!
//! - [`core`] - Core types and operations

#![forbid(unsafe_code)]

pub mod core;

// Re-export commonly used items at crate root
pub use crate::core::error::{KeyError, KeyResult};
pub use crate::core::header::{make_header, parse_header, FORMAT_VERSION, HEADER_LENGTH};
pub use crate::core::keytype::{KeyType, KeyTypeDescriptor};
pub use crate::core::loader::{
    load_key_material, load_keys, load_versions, KeyReader, MemoryKeyReader, MissingVersion,
    VersionMap,
};
pub use crate::core::operations::id::{KeyId, KEY_ID_SIZE};
pub use crate::core::types::{
    DecryptKey, EncryptKey, KeyIdentity, KeyMaterial, KeyRecord, MacKey, SignKey, SymmetricKey,
    VerifyKey,
};

#[cfg(feature = "dsa")]
pub use crate::core::types::{DsaPrivateKey, DsaPublicKey};

#[cfg(feature = "rsa")]
pub use crate::core::types::{RsaPrivateKey, RsaPublicKey};
