//! `DsaPublicKey` / `DsaPrivateKey` - DSA over SHA-1.
//!
//! Signatures are the DER encoding of `SEQUENCE { r INTEGER, s INTEGER }`
//! with no envelope header. The key ID hashes the public components P, Q,
//! G and Y, each length-prefixed.

use core::fmt::{self, Debug};

use dsa::signature::{DigestVerifier, RandomizedDigestSigner, SignatureEncoding};
use dsa::{BigUint, Components, KeySize, Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use sha1::{Digest, Sha1};

use crate::core::error::{KeyError, KeyResult};
use crate::core::keytype::KeyType;
use crate::core::operations::id::{compute_prefixed_id, KeyId};
use crate::core::record::{
    decode_web64, encode_web64, parse_record, write_record, DsaPrivateKeyRecord,
    DsaPublicKeyRecord,
};
use crate::core::types::{KeyIdentity, KeyRecord, SignKey, VerifyKey};

fn decode_uint(encoded: &str) -> KeyResult<BigUint> {
    Ok(BigUint::from_bytes_be(&decode_web64(encoded)?))
}

fn encode_uint(n: &BigUint) -> String {
    encode_web64(&n.to_bytes_be())
}

// Only 1024-bit keys are accepted, which pairs with a 160-bit Q.
const Q_BITS: usize = 160;

#[allow(deprecated)]
fn key_size(bits: u32) -> KeyResult<KeySize> {
    match bits {
        1024 => Ok(KeySize::DSA_1024_160),
        _ => Err(KeyError::InvalidKeySize),
    }
}

/// A DSA verification key.
#[derive(Clone)]
pub struct DsaPublicKey {
    key: VerifyingKey,
    size: u32,
}

impl DsaPublicKey {
    /// Builds a public key from its P, Q, G and Y components.
    ///
    /// P must be exactly `size` bits and Q exactly 160 bits.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if `size` is not accepted or does
    /// not match the parameters, and `KeyError::Dsa` if the components are
    /// rejected by DSA.
    pub fn from_components(
        p: BigUint,
        q: BigUint,
        g: BigUint,
        y: BigUint,
        size: u32,
    ) -> KeyResult<Self> {
        KeyType::DsaPub.check_size(size)?;
        if p.bits() != size as usize || q.bits() != Q_BITS {
            tracing::debug!(
                size,
                p_bits = p.bits(),
                q_bits = q.bits(),
                "DSA parameters do not match declared size"
            );
            return Err(KeyError::InvalidKeySize);
        }
        let components = Components::from_components(p, q, g)?;
        let key = VerifyingKey::from_components(components, y)?;
        Ok(Self { key, size })
    }

    /// Returns the underlying verifying key.
    #[must_use]
    pub const fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Key size in bits.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    fn to_record_fields(&self) -> DsaPublicKeyRecord {
        let components = self.key.components();
        DsaPublicKeyRecord {
            q: encode_uint(components.q()),
            p: encode_uint(components.p()),
            g: encode_uint(components.g()),
            y: encode_uint(self.key.y()),
            size: self.size,
        }
    }

    fn from_record_fields(record: &DsaPublicKeyRecord) -> KeyResult<Self> {
        KeyType::DsaPub.check_size(record.size)?;
        Self::from_components(
            decode_uint(&record.p)?,
            decode_uint(&record.q)?,
            decode_uint(&record.g)?,
            decode_uint(&record.y)?,
            record.size,
        )
    }
}

impl KeyIdentity for DsaPublicKey {
    fn key_id(&self) -> KeyId {
        let components = self.key.components();
        let parts = [
            components.p().to_bytes_be(),
            components.q().to_bytes_be(),
            components.g().to_bytes_be(),
            self.key.y().to_bytes_be(),
        ];
        compute_prefixed_id(parts.iter().map(Vec::as_slice))
    }
}

impl VerifyKey for DsaPublicKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool> {
        let signature =
            Signature::try_from(signature).map_err(|_| KeyError::MalformedSignature)?;
        let digest = Sha1::new_with_prefix(message);
        Ok(self.key.verify_digest(digest, &signature).is_ok())
    }
}

impl KeyRecord for DsaPublicKey {
    const KEY_TYPE: KeyType = KeyType::DsaPub;

    fn from_record(record: &str) -> KeyResult<Self> {
        Self::from_record_fields(&parse_record(record)?)
    }

    fn to_record(&self) -> KeyResult<String> {
        write_record(&self.to_record_fields())
    }
}

impl Debug for DsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaPublicKey")
            .field("id", &self.key_id())
            .field("size", &self.size)
            .finish()
    }
}

/// A DSA signing key together with its public half.
#[derive(Clone)]
pub struct DsaPrivateKey {
    key: SigningKey,
    public_key: DsaPublicKey,
    size: u32,
}

impl DsaPrivateKey {
    /// Generates fresh 1024-bit domain parameters and a key pair.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Dsa` if generation fails.
    pub fn generate() -> KeyResult<Self> {
        Self::generate_with_size(KeyType::DsaPriv.default_size())
    }

    /// Generates domain parameters and a key pair of `bits` bits.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if `bits` is not accepted.
    pub fn generate_with_size(bits: u32) -> KeyResult<Self> {
        KeyType::DsaPriv.check_size(bits)?;
        tracing::debug!(bits, "generating DSA key");

        let components = Components::generate(&mut OsRng, key_size(bits)?);
        let key = SigningKey::generate(&mut OsRng, components);
        let public_key = DsaPublicKey {
            key: key.verifying_key().clone(),
            size: bits,
        };

        Ok(Self {
            key,
            public_key,
            size: bits,
        })
    }

    /// Builds a private key from a public key and the secret exponent X.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if `size` differs from the public
    /// key's, `KeyError::InvalidKey` if `Y != G^X mod P`, and `KeyError::Dsa`
    /// if X is out of range.
    pub fn from_components(public_key: DsaPublicKey, x: BigUint, size: u32) -> KeyResult<Self> {
        KeyType::DsaPriv.check_size(size)?;
        if size != public_key.size {
            return Err(KeyError::InvalidKeySize);
        }

        let components = public_key.key.components();
        if components.g().modpow(&x, components.p()) != *public_key.key.y() {
            return Err(KeyError::InvalidKey);
        }

        let key = SigningKey::from_components(public_key.key.clone(), x)?;
        Ok(Self {
            key,
            public_key,
            size,
        })
    }

    /// Returns the public half.
    #[must_use]
    pub const fn public_key(&self) -> &DsaPublicKey {
        &self.public_key
    }

    /// Key size in bits.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }
}

impl KeyIdentity for DsaPrivateKey {
    fn key_id(&self) -> KeyId {
        self.public_key.key_id()
    }
}

impl VerifyKey for DsaPrivateKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool> {
        self.public_key.verify(message, signature)
    }
}

impl SignKey for DsaPrivateKey {
    fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        let digest = Sha1::new_with_prefix(message);
        let signature: Signature = self.key.try_sign_digest_with_rng(&mut OsRng, digest)?;
        Ok(signature.to_vec())
    }
}

impl KeyRecord for DsaPrivateKey {
    const KEY_TYPE: KeyType = KeyType::DsaPriv;

    fn from_record(record: &str) -> KeyResult<Self> {
        let record: DsaPrivateKeyRecord = parse_record(record)?;

        KeyType::DsaPriv.check_size(record.size)?;
        let public_key = DsaPublicKey::from_record_fields(&record.public_key)?;
        let x = decode_uint(&record.x)?;

        Self::from_components(public_key, x, record.size)
    }

    fn to_record(&self) -> KeyResult<String> {
        write_record(&DsaPrivateKeyRecord {
            public_key: self.public_key.to_record_fields(),
            size: self.size,
            x: encode_uint(self.key.x()),
        })
    }
}

impl Debug for DsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaPrivateKey")
            .field("id", &self.key_id())
            .field("size", &self.size)
            .field("x", &"[REDACTED]")
            .finish()
    }
}
