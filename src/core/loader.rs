//! Versioned key loading.
//!
//! A key set stores one JSON record per version number. The loader fetches
//! each listed version from a [`KeyReader`], decodes it and collects the
//! results into a [`VersionMap`]. Loading is all-or-nothing: the first
//! failure aborts and no partial map is returned.
//!
//! # Example
//!
//! ```rust
//! use keyczar_core::{load_keys, KeyIdentity, KeyRecord, MacKey, MemoryKeyReader, SignKey};
//!
//! # fn main() -> keyczar_core::KeyResult<()> {
//! let key = MacKey::generate()?;
//! let mut reader = MemoryKeyReader::new();
//! reader.insert(1, key.to_record()?);
//!
//! let keys = load_keys::<MacKey, _>(&reader, &[1])?;
//! let primary = keys.get(1).ok_or(keyczar_core::KeyError::InvalidKey)?;
//! assert_eq!(primary.key_id(), key.key_id());
//! assert_eq!(primary.sign(b"data")?, key.sign(b"data")?);
//! # Ok(())
//! # }
//! ```

use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use crate::core::error::{KeyError, KeyResult};
use crate::core::header::parse_header;
use crate::core::keytype::KeyType;
use crate::core::operations::id::KeyId;
use crate::core::types::{KeyIdentity, KeyMaterial, KeyRecord};

/// A source of serialized key records, addressed by version number.
pub trait KeyReader {
    /// Error returned when a version cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the JSON record stored for `version`.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if the record cannot be fetched.
    fn get_key(&self, version: u32) -> Result<String, Self::Error>;
}

impl<R: KeyReader + ?Sized> KeyReader for &R {
    type Error = R::Error;

    fn get_key(&self, version: u32) -> Result<String, Self::Error> {
        (**self).get_key(version)
    }
}

/// Returned by [`MemoryKeyReader`] for a version it does not hold.
#[derive(Debug, Error)]
#[error("No record stored for version {0}")]
pub struct MissingVersion(pub u32);

/// A [`KeyReader`] backed by an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct MemoryKeyReader {
    records: HashMap<u32, String>,
}

impl MemoryKeyReader {
    /// Creates an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `version`, replacing any previous record.
    pub fn insert(&mut self, version: u32, record: impl Into<String>) -> &mut Self {
        self.records.insert(version, record.into());
        self
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for MemoryKeyReader {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|(v, r)| (v, r.into())).collect(),
        }
    }
}

impl KeyReader for MemoryKeyReader {
    type Error = MissingVersion;

    fn get_key(&self, version: u32) -> Result<String, MissingVersion> {
        self.records
            .get(&version)
            .cloned()
            .ok_or(MissingVersion(version))
    }
}

/// Loaded keys ordered by version number. Immutable once built.
#[derive(Clone, Debug)]
pub struct VersionMap<K> {
    keys: BTreeMap<u32, K>,
}

impl<K> VersionMap<K> {
    /// The key stored under `version`.
    #[must_use]
    pub fn get(&self, version: u32) -> Option<&K> {
        self.keys.get(&version)
    }

    /// Iterates over `(version, key)` pairs in ascending version order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &K)> {
        self.keys.iter().map(|(v, k)| (*v, k))
    }

    /// Loaded version numbers in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.keys.keys().copied()
    }

    /// Number of loaded keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: KeyIdentity> VersionMap<K> {
    /// The lowest-versioned key whose identifier is `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &KeyId) -> Option<(u32, &K)> {
        self.iter().find(|(_, key)| key.key_id() == *id)
    }

    /// The key named by an envelope's header.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::ShortCiphertext` or `KeyError::InvalidHeader` if the
    /// header cannot be parsed.
    pub fn key_for_envelope(&self, envelope: &[u8]) -> KeyResult<Option<(u32, &K)>> {
        let (id, _) = parse_header(envelope)?;
        Ok(self.find_by_id(&id))
    }
}

impl<'a, K> IntoIterator for &'a VersionMap<K> {
    type Item = (&'a u32, &'a K);
    type IntoIter = btree_map::Iter<'a, u32, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Loads `versions` from `reader`, decoding each record with `decode`.
///
/// # Errors
///
/// - `KeyError::DuplicateVersion` if a version is listed twice
/// - `KeyError::Source` if the reader fails
/// - any error returned by `decode`
pub fn load_versions<R, K, F>(
    reader: &R,
    versions: &[u32],
    mut decode: F,
) -> KeyResult<VersionMap<K>>
where
    R: KeyReader + ?Sized,
    F: FnMut(&str) -> KeyResult<K>,
{
    let mut seen = BTreeSet::new();
    if let Some(&dup) = versions.iter().find(|v| !seen.insert(**v)) {
        return Err(KeyError::DuplicateVersion(dup));
    }

    let mut keys = BTreeMap::new();
    for &version in versions {
        let record = reader.get_key(version).map_err(|e| KeyError::Source {
            version,
            source: Box::new(e),
        })?;
        let key = decode(&record).inspect_err(|e| {
            tracing::debug!(version, error = %e, "failed to load key version");
        })?;
        tracing::debug!(version, "loaded key version");
        keys.insert(version, key);
    }

    Ok(VersionMap { keys })
}

/// Loads keys of a statically known type.
///
/// # Errors
///
/// See [`load_versions`].
pub fn load_keys<K, R>(reader: &R, versions: &[u32]) -> KeyResult<VersionMap<K>>
where
    K: KeyRecord,
    R: KeyReader + ?Sized,
{
    let key_type = K::KEY_TYPE;
    tracing::debug!(%key_type, count = versions.len(), "loading key set");
    load_versions(reader, versions, K::from_record)
}

/// Loads keys whose type is only known at run time.
///
/// # Errors
///
/// See [`load_versions`]. Returns `KeyError::UnsupportedKeyType` if the
/// type's feature is disabled.
pub fn load_key_material<R>(
    reader: &R,
    key_type: KeyType,
    versions: &[u32],
) -> KeyResult<VersionMap<KeyMaterial>>
where
    R: KeyReader + ?Sized,
{
    tracing::debug!(%key_type, count = versions.len(), "loading key set");
    load_versions(reader, versions, |record| {
        KeyMaterial::from_record(key_type, record)
    })
}
