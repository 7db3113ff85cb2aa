//! Key identifier computation.
//!
//! A key ID is the first four bytes of a SHA-1 digest over a key's public
//! material. Multi-part material is hashed as a sequence of 4-byte
//! big-endian length prefixes each followed by the part's bytes.

use core::fmt::{self, Debug, Display};

use sha1::{Digest, Sha1};

/// Key ID size in bytes.
pub const KEY_ID_SIZE: usize = 4;

/// A 4-byte key fingerprint.
///
/// Key IDs only have 32 bits, so distinct keys can collide; they select a
/// candidate key and never replace verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId([u8; KEY_ID_SIZE]);

impl KeyId {
    /// Creates a key ID from raw bytes.
    #[must_use]
    pub const fn new(id: [u8; KEY_ID_SIZE]) -> Self {
        Self(id)
    }

    /// Returns the raw ID bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_ID_SIZE] {
        &self.0
    }
}

impl From<[u8; KEY_ID_SIZE]> for KeyId {
    fn from(id: [u8; KEY_ID_SIZE]) -> Self {
        Self::new(id)
    }
}

impl AsRef<[u8]> for KeyId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({self})")
    }
}

/// Incremental SHA-1 hasher producing a [`KeyId`].
#[derive(Clone, Default)]
pub(crate) struct KeyIdHasher(Sha1);

impl KeyIdHasher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes.
    pub(crate) fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.update(bytes);
        self
    }

    /// Feeds a 4-byte big-endian length followed by the bytes.
    ///
    /// Parts are key components, so their length always fits the prefix.
    pub(crate) fn update_prefixed(&mut self, bytes: &[u8]) -> &mut Self {
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        self.0.update(len.to_be_bytes());
        self.update(bytes)
    }

    pub(crate) fn finish(&self) -> KeyId {
        let digest = self.0.clone().finalize();
        let mut id = [0u8; KEY_ID_SIZE];
        id.copy_from_slice(&digest[..KEY_ID_SIZE]);
        KeyId(id)
    }
}

/// Computes the key ID of length-prefixed parts, in order.
#[must_use]
pub(crate) fn compute_prefixed_id<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> KeyId {
    let mut hasher = KeyIdHasher::new();
    for part in parts {
        hasher.update_prefixed(part);
    }
    hasher.finish()
}
