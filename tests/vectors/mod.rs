//! Test vector types for known-answer tests.
//!
//! The vectors were produced by an independent implementation (Python
//! `cryptography` and `hashlib`) so they check interoperability, not just
//! self-consistency. Byte fields are hex; records are the JSON key records
//! exactly as a key set would store them.

// Not every suite uses every field
#![allow(dead_code)]

use serde::Deserialize;

/// A test vector suite (top-level JSON structure).
#[derive(Debug, Deserialize)]
pub struct TestVectorSuite<T> {
    pub name: String,
    pub tests: Vec<T>,
}

/// Test vector for `HMAC_SHA1` keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HmacTestVector {
    pub name: String,
    /// JSON key record
    pub record: String,
    /// Hex-encoded expected key ID
    pub key_id: String,
    /// Hex-encoded message
    pub message: String,
    /// Hex-encoded expected tag
    pub tag: String,
}

/// Test vector for `AES` keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AesTestVector {
    pub name: String,
    /// JSON key record
    pub record: String,
    /// Hex-encoded expected key ID
    pub key_id: String,
    /// Hex-encoded plaintext
    pub plaintext: String,
    /// Hex-encoded envelope of `plaintext`
    pub ciphertext: String,
    /// Hex-encoded envelope with a valid tag but malformed padding
    pub bad_padding_ciphertext: String,
}

/// Test vector for `DSA_PRIV` / `DSA_PUB` keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaTestVector {
    pub name: String,
    pub public_record: String,
    pub private_record: String,
    /// Hex-encoded expected key ID
    pub key_id: String,
    /// Hex-encoded message
    pub message: String,
    /// Hex-encoded DER signature of `message`
    pub signature: String,
}

/// Test vector for `RSA_PRIV` / `RSA_PUB` keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaTestVector {
    pub name: String,
    pub public_record: String,
    pub private_record: String,
    /// Private record whose CRT coefficient is off by one
    pub bad_crt_record: String,
    /// Hex-encoded expected key ID
    pub key_id: String,
    /// Hex-encoded message
    pub message: String,
    /// Hex-encoded PKCS#1 v1.5 signature of `message`
    pub signature: String,
    /// Hex-encoded plaintext
    pub plaintext: String,
    /// Hex-encoded envelope of `plaintext`
    pub ciphertext: String,
}

/// Decode a hex string to bytes.
/// Returns `None` if the string is not valid hex.
pub fn hex_decode(s: &str) -> Option<Vec<u8>> {
    hex::decode(s).ok()
}

/// Load a test vector suite from a JSON file.
pub fn load_vectors<T: serde::de::DeserializeOwned>(path: &str) -> TestVectorSuite<T> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read test vector file {path}: {e}"));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse test vector file {path}: {e}"))
}
