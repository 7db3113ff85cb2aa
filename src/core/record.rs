//! Serialized key records.
//!
//! Keys are stored as JSON objects whose byte and big-integer fields are
//! unpadded web-safe base64 and whose `size` fields are bit lengths. Field
//! names are a fixed wire contract; the aliases accept records written by
//! older Keyczar implementations.

use base64::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::error::{KeyError, KeyResult};

/// Cipher mode written into symmetric key records.
pub const CBC_MODE: &str = "CBC";

/// Decodes an unpadded web-safe base64 field.
///
/// # Errors
///
/// Returns `KeyError::Base64Decode` on any invalid character or padding.
pub fn decode_web64(encoded: &str) -> KeyResult<Vec<u8>> {
    BASE64_URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(KeyError::Base64Decode)
}

/// Encodes bytes as unpadded web-safe base64.
#[must_use]
pub fn encode_web64(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Parses a JSON record.
pub(crate) fn parse_record<'a, T: Deserialize<'a>>(record: &'a str) -> KeyResult<T> {
    serde_json::from_str(record).map_err(KeyError::InvalidRecord)
}

/// Writes a JSON record.
pub(crate) fn write_record<T: Serialize>(record: &T) -> KeyResult<String> {
    serde_json::to_string(record).map_err(KeyError::InvalidRecord)
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MacKeyRecord {
    #[serde(alias = "hmacKeyString")]
    pub key: String,
    pub size: u32,
}

fn default_mode() -> String {
    CBC_MODE.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SymmetricKeyRecord {
    #[serde(alias = "aesKeyString")]
    pub key: String,
    pub size: u32,
    #[serde(alias = "hmacKey")]
    pub mac_key: MacKeyRecord,
    #[serde(default = "default_mode")]
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DsaPublicKeyRecord {
    #[serde(alias = "Q")]
    pub q: String,
    #[serde(alias = "P")]
    pub p: String,
    #[serde(alias = "G")]
    pub g: String,
    #[serde(alias = "Y")]
    pub y: String,
    pub size: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DsaPrivateKeyRecord {
    pub public_key: DsaPublicKeyRecord,
    pub size: u32,
    pub x: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RsaPublicKeyRecord {
    pub modulus: String,
    pub public_exponent: String,
    pub size: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RsaPrivateKeyRecord {
    pub crt_coefficient: String,
    pub prime_exponent_p: String,
    pub prime_exponent_q: String,
    pub prime_p: String,
    pub prime_q: String,
    pub private_exponent: String,
    pub public_key: RsaPublicKeyRecord,
    pub size: u32,
}
