//! `RsaPublicKey` / `RsaPrivateKey` - RSA signing and encryption.
//!
//! - Signatures: PKCS#1 v1.5 over a SHA-1 digest, no header
//! - Encryption: `header || OAEP(SHA-1, MGF1-SHA-1, no label)`
//!
//! Private keys carry the CRT values read from their record. They are never
//! trusted as given: loading recomputes each one from the primes and the
//! private exponent and rejects the key on any mismatch.

use core::fmt::{self, Debug};

use rand_core::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Oaep, Pkcs1v15Sign};
use sha1::{Digest, Sha1};

use crate::core::error::{KeyError, KeyResult};
use crate::core::header::{make_header, HEADER_LENGTH};
use crate::core::keytype::KeyType;
use crate::core::operations::id::{compute_prefixed_id, KeyId};
use crate::core::record::{
    decode_web64, encode_web64, parse_record, write_record, RsaPrivateKeyRecord,
    RsaPublicKeyRecord,
};
use crate::core::types::{DecryptKey, EncryptKey, KeyIdentity, KeyRecord, SignKey, VerifyKey};

fn decode_uint(encoded: &str) -> KeyResult<BigUint> {
    Ok(BigUint::from_bytes_be(&decode_web64(encoded)?))
}

fn encode_uint(n: &BigUint) -> String {
    encode_web64(&n.to_bytes_be())
}

/// An RSA public key: verification and encryption.
#[derive(Clone)]
pub struct RsaPublicKey {
    key: rsa::RsaPublicKey,
    size: u32,
}

impl RsaPublicKey {
    /// Builds a public key from its modulus and public exponent.
    ///
    /// The modulus must be exactly `size` bits long.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` for an unaccepted size or one the
    /// modulus does not have, and `KeyError::Rsa` if the components are
    /// rejected.
    pub fn from_components(n: BigUint, e: BigUint, size: u32) -> KeyResult<Self> {
        KeyType::RsaPub.check_size(size)?;
        if n.bits() != size as usize {
            tracing::debug!(
                size,
                n_bits = n.bits(),
                "RSA modulus does not match declared size"
            );
            return Err(KeyError::InvalidKeySize);
        }
        let key = rsa::RsaPublicKey::new(n, e)?;
        Ok(Self { key, size })
    }

    /// Returns the underlying public key.
    #[must_use]
    pub const fn inner(&self) -> &rsa::RsaPublicKey {
        &self.key
    }

    /// Key size in bits.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    fn to_record_fields(&self) -> RsaPublicKeyRecord {
        RsaPublicKeyRecord {
            modulus: encode_uint(self.key.n()),
            public_exponent: encode_uint(self.key.e()),
            size: self.size,
        }
    }

    fn from_record_fields(record: &RsaPublicKeyRecord) -> KeyResult<Self> {
        KeyType::RsaPub.check_size(record.size)?;
        Self::from_components(
            decode_uint(&record.modulus)?,
            decode_uint(&record.public_exponent)?,
            record.size,
        )
    }
}

impl KeyIdentity for RsaPublicKey {
    fn key_id(&self) -> KeyId {
        let n = self.key.n().to_bytes_be();
        let e = self.key.e().to_bytes_be();
        compute_prefixed_id([n.as_slice(), e.as_slice()])
    }
}

impl VerifyKey for RsaPublicKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool> {
        let digest = Sha1::digest(message);
        match self.key.verify(Pkcs1v15Sign::new::<Sha1>(), &digest, signature) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::trace!(error = %e, "RSA signature rejected");
                Ok(false)
            }
        }
    }
}

impl EncryptKey for RsaPublicKey {
    fn encrypt(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        let ciphertext = self
            .key
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), plaintext)?;

        let mut out = Vec::with_capacity(HEADER_LENGTH + ciphertext.len());
        out.extend_from_slice(&make_header(&self.key_id()));
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }
}

impl KeyRecord for RsaPublicKey {
    const KEY_TYPE: KeyType = KeyType::RsaPub;

    fn from_record(record: &str) -> KeyResult<Self> {
        Self::from_record_fields(&parse_record(record)?)
    }

    fn to_record(&self) -> KeyResult<String> {
        write_record(&self.to_record_fields())
    }
}

impl Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("id", &self.key_id())
            .field("size", &self.size)
            .finish()
    }
}

/// Precomputed CRT values: `d mod (p-1)`, `d mod (q-1)`, `q^-1 mod p`.
#[derive(Clone)]
struct CrtValues {
    dp: BigUint,
    dq: BigUint,
    qinv: BigUint,
}

impl CrtValues {
    /// Derives the CRT values from the primes and private exponent.
    fn compute(p: &BigUint, q: &BigUint, d: &BigUint) -> Self {
        let one = BigUint::from(1u8);
        let two = BigUint::from(2u8);
        let dp = d % &(p - &one);
        let dq = d % &(q - &one);
        // p is prime, so q^(p-2) is the inverse of q mod p
        let qinv = q.modpow(&(p - &two), p);
        Self { dp, dq, qinv }
    }

    /// Checks supplied values against the key they claim to belong to.
    fn matches(&self, p: &BigUint, q: &BigUint, d: &BigUint) -> bool {
        let one = BigUint::from(1u8);
        self.dp == d % &(p - &one)
            && self.dq == d % &(q - &one)
            && self.qinv < *p
            && (&self.qinv * q) % p == one
    }
}

/// An RSA private key: signing and decryption.
#[derive(Clone)]
pub struct RsaPrivateKey {
    key: rsa::RsaPrivateKey,
    crt: CrtValues,
    public_key: RsaPublicKey,
    size: u32,
}

impl RsaPrivateKey {
    /// Generates a key of the default size.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Rsa` if generation fails.
    pub fn generate() -> KeyResult<Self> {
        Self::generate_with_size(KeyType::RsaPriv.default_size())
    }

    /// Generates a key with a `bits`-bit modulus.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if `bits` is not accepted and
    /// `KeyError::Rsa` if generation fails.
    pub fn generate_with_size(bits: u32) -> KeyResult<Self> {
        KeyType::RsaPriv.check_size(bits)?;
        tracing::debug!(bits, "generating RSA key");

        let key = rsa::RsaPrivateKey::new(&mut OsRng, bits as usize)?;
        let (p, q) = match key.primes() {
            [p, q] => (p, q),
            _ => return Err(KeyError::InvalidKey),
        };
        let crt = CrtValues::compute(p, q, key.d());
        let public_key = RsaPublicKey {
            key: key.to_public_key(),
            size: bits,
        };

        Ok(Self {
            key,
            crt,
            public_key,
            size: bits,
        })
    }

    /// Builds a private key from serialized components.
    ///
    /// The supplied CRT values are kept only if they agree with values
    /// recomputed from `p`, `q` and `d`, and `p * q` must equal the modulus.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if `size` differs from the public
    /// key's, `KeyError::InvalidKey` on any other inconsistency and
    /// `KeyError::Rsa` if the RSA backend rejects the key.
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        public_key: RsaPublicKey,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
        size: u32,
    ) -> KeyResult<Self> {
        KeyType::RsaPriv.check_size(size)?;
        if size != public_key.size {
            return Err(KeyError::InvalidKeySize);
        }

        let n = public_key.key.n();
        let one = BigUint::from(1u8);
        if p <= one || q <= one || &p * &q != *n {
            return Err(KeyError::InvalidKey);
        }

        let crt = CrtValues { dp, dq, qinv };
        if !crt.matches(&p, &q, &d) {
            tracing::debug!("RSA CRT values do not match key");
            return Err(KeyError::InvalidKey);
        }

        let e = public_key.key.e().clone();
        let key = rsa::RsaPrivateKey::from_components(n.clone(), e, d, vec![p, q])?;
        key.validate()?;

        Ok(Self {
            key,
            crt,
            public_key,
            size,
        })
    }

    /// Returns the public half.
    #[must_use]
    pub const fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Key size in bits.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }
}

impl KeyIdentity for RsaPrivateKey {
    fn key_id(&self) -> KeyId {
        self.public_key.key_id()
    }
}

impl VerifyKey for RsaPrivateKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<bool> {
        self.public_key.verify(message, signature)
    }
}

impl SignKey for RsaPrivateKey {
    fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        let digest = Sha1::digest(message);
        Ok(self
            .key
            .sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha1>(), &digest)?)
    }
}

impl EncryptKey for RsaPrivateKey {
    fn encrypt(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        self.public_key.encrypt(plaintext)
    }
}

impl DecryptKey for RsaPrivateKey {
    fn decrypt(&self, ciphertext: &[u8]) -> KeyResult<Vec<u8>> {
        let payload = ciphertext
            .get(HEADER_LENGTH..)
            .ok_or(KeyError::ShortCiphertext)?;
        Ok(self
            .key
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha1>(), payload)?)
    }
}

impl KeyRecord for RsaPrivateKey {
    const KEY_TYPE: KeyType = KeyType::RsaPriv;

    fn from_record(record: &str) -> KeyResult<Self> {
        let record: RsaPrivateKeyRecord = parse_record(record)?;

        KeyType::RsaPriv.check_size(record.size)?;
        let public_key = RsaPublicKey::from_record_fields(&record.public_key)?;

        Self::from_components(
            public_key,
            decode_uint(&record.private_exponent)?,
            decode_uint(&record.prime_p)?,
            decode_uint(&record.prime_q)?,
            decode_uint(&record.prime_exponent_p)?,
            decode_uint(&record.prime_exponent_q)?,
            decode_uint(&record.crt_coefficient)?,
            record.size,
        )
    }

    fn to_record(&self) -> KeyResult<String> {
        let (p, q) = match self.key.primes() {
            [p, q] => (p, q),
            _ => return Err(KeyError::InvalidKey),
        };
        write_record(&RsaPrivateKeyRecord {
            crt_coefficient: encode_uint(&self.crt.qinv),
            prime_exponent_p: encode_uint(&self.crt.dp),
            prime_exponent_q: encode_uint(&self.crt.dq),
            prime_p: encode_uint(p),
            prime_q: encode_uint(q),
            private_exponent: encode_uint(self.key.d()),
            public_key: self.public_key.to_record_fields(),
            size: self.size,
        })
    }
}

impl Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("id", &self.key_id())
            .field("size", &self.size)
            .field("d", &"[REDACTED]")
            .finish()
    }
}
