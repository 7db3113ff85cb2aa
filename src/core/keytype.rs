//! Key type descriptors.
//!
//! Each key family has a fixed name, a default bit length used for
//! generation, and the set of bit lengths accepted when loading or
//! generating keys. The table is static data and never changes at run time.

use core::fmt::{self, Display};
use core::str::FromStr;

use crate::core::error::{KeyError, KeyResult};

/// The key families understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// AES-CBC with a bundled HMAC-SHA1 key.
    Aes,
    /// HMAC-SHA1.
    HmacSha1,
    /// DSA private (signing) key.
    DsaPriv,
    /// DSA public (verification) key.
    DsaPub,
    /// RSA private key (signing and decryption).
    RsaPriv,
    /// RSA public key (verification and encryption).
    RsaPub,
}

/// Static description of a key family.
#[derive(Debug)]
pub struct KeyTypeDescriptor {
    /// Canonical name, as written in key metadata.
    pub name: &'static str,
    /// Bit length used when generating a key without an explicit size.
    pub default_size: u32,
    /// Every accepted bit length.
    pub acceptable_sizes: &'static [u32],
}

const AES: KeyTypeDescriptor = KeyTypeDescriptor {
    name: "AES",
    default_size: 128,
    acceptable_sizes: &[128, 192, 256],
};

const HMAC_SHA1: KeyTypeDescriptor = KeyTypeDescriptor {
    name: "HMAC_SHA1",
    default_size: 256,
    acceptable_sizes: &[160, 256],
};

const DSA_PRIV: KeyTypeDescriptor = KeyTypeDescriptor {
    name: "DSA_PRIV",
    default_size: 1024,
    acceptable_sizes: &[1024],
};

const DSA_PUB: KeyTypeDescriptor = KeyTypeDescriptor {
    name: "DSA_PUB",
    default_size: 1024,
    acceptable_sizes: &[1024],
};

const RSA_PRIV: KeyTypeDescriptor = KeyTypeDescriptor {
    name: "RSA_PRIV",
    default_size: 2048,
    acceptable_sizes: &[512, 768, 1024, 2048, 4096],
};

const RSA_PUB: KeyTypeDescriptor = KeyTypeDescriptor {
    name: "RSA_PUB",
    default_size: 2048,
    acceptable_sizes: &[512, 768, 1024, 2048, 4096],
};

impl KeyType {
    /// All key types, in table order.
    pub const ALL: [Self; 6] = [
        Self::Aes,
        Self::HmacSha1,
        Self::DsaPriv,
        Self::DsaPub,
        Self::RsaPriv,
        Self::RsaPub,
    ];

    /// Returns the static descriptor for this key type.
    #[must_use]
    pub const fn descriptor(self) -> &'static KeyTypeDescriptor {
        match self {
            Self::Aes => &AES,
            Self::HmacSha1 => &HMAC_SHA1,
            Self::DsaPriv => &DSA_PRIV,
            Self::DsaPub => &DSA_PUB,
            Self::RsaPriv => &RSA_PRIV,
            Self::RsaPub => &RSA_PUB,
        }
    }

    /// Canonical name of the key type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Bit length used for generation when none is given.
    #[must_use]
    pub const fn default_size(self) -> u32 {
        self.descriptor().default_size
    }

    /// Returns true if `bits` is one of the accepted sizes.
    ///
    /// There is no rounding: a size is either listed or rejected.
    #[must_use]
    pub fn is_acceptable_size(self, bits: u32) -> bool {
        self.descriptor().acceptable_sizes.contains(&bits)
    }

    /// Like [`is_acceptable_size`](Self::is_acceptable_size), but as a
    /// validation step.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeySize` if `bits` is not accepted.
    pub fn check_size(self, bits: u32) -> KeyResult<()> {
        if self.is_acceptable_size(bits) {
            Ok(())
        } else {
            tracing::debug!(key_type = self.name(), bits, "rejected key size");
            Err(KeyError::InvalidKeySize)
        }
    }

    /// Validates the bit length of a raw byte key.
    pub(crate) fn check_byte_len(self, len: usize) -> KeyResult<()> {
        let bits = u32::try_from(len)
            .ok()
            .and_then(|n| n.checked_mul(8))
            .ok_or(KeyError::InvalidKeySize)?;
        self.check_size(bits)
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kt| kt.name() == s)
            .ok_or_else(|| KeyError::UnsupportedKeyType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        assert_eq!(KeyType::Aes.default_size(), 128);
        assert_eq!(KeyType::HmacSha1.default_size(), 256);
        assert_eq!(KeyType::DsaPriv.default_size(), 1024);
        assert_eq!(KeyType::RsaPriv.default_size(), 2048);
    }

    #[test]
    fn test_default_size_is_acceptable() {
        for kt in KeyType::ALL {
            assert!(kt.is_acceptable_size(kt.default_size()), "{kt}");
        }
    }

    #[test]
    fn test_no_rounding() {
        assert!(KeyType::Aes.is_acceptable_size(192));
        assert!(!KeyType::Aes.is_acceptable_size(191));
        assert!(!KeyType::Aes.is_acceptable_size(193));
        assert!(!KeyType::Aes.is_acceptable_size(0));
        assert!(!KeyType::DsaPub.is_acceptable_size(2048));
        assert!(matches!(
            KeyType::RsaPub.check_size(3072),
            Err(KeyError::InvalidKeySize)
        ));
    }

    #[test]
    fn test_check_byte_len() {
        assert!(KeyType::HmacSha1.check_byte_len(20).is_ok());
        assert!(KeyType::HmacSha1.check_byte_len(32).is_ok());
        assert!(KeyType::HmacSha1.check_byte_len(16).is_err());
        assert!(KeyType::Aes.check_byte_len(usize::MAX).is_err());
    }

    #[test]
    fn test_name_roundtrip() -> KeyResult<()> {
        for kt in KeyType::ALL {
            assert_eq!(kt.to_string().parse::<KeyType>()?, kt);
        }
        assert!(matches!(
            "ECDSA_PRIV".parse::<KeyType>(),
            Err(KeyError::UnsupportedKeyType(_))
        ));
        Ok(())
    }
}
