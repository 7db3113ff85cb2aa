//! Error types for key material operations.
//!
//! This module provides a unified error type for loading, generating and
//! using keys. Messages for integrity failures are intentionally vague to
//! avoid leaking information that could aid attacks.

use thiserror::Error;

/// Errors that can occur when loading or using key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// A declared or actual key size is not acceptable for its key type.
    #[error("Invalid key size")]
    InvalidKeySize,

    /// A key field is not valid unpadded web-safe base64.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// The serialized key record is not valid JSON for its key type.
    #[error("Invalid key record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    /// The input is too short to contain a header, IV and MAC tag.
    #[error("Ciphertext too short")]
    ShortCiphertext,

    /// The envelope header is malformed or carries an unknown format version.
    #[error("Invalid envelope header")]
    InvalidHeader,

    /// MAC or signature verification failed.
    /// Intentionally vague for security.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Block padding of a decrypted message is malformed.
    #[error("Invalid padding")]
    InvalidPadding,

    /// A signature could not be decoded.
    #[error("Malformed signature")]
    MalformedSignature,

    /// A length-prefixed key pack is truncated or has trailing data.
    #[error("Malformed key pack")]
    MalformedPack,

    /// The block cipher rejected the key length.
    #[error("Invalid key length for cipher")]
    InvalidKeyLength,

    /// Key material is internally inconsistent.
    #[error("Invalid key material")]
    InvalidKey,

    /// The symmetric cipher mode of a record is not supported.
    #[error("Unsupported cipher mode: {0}")]
    UnsupportedMode(String),

    /// The key type is unknown or its feature is not enabled.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// A version number was listed more than once.
    #[error("Duplicate key version {0}")]
    DuplicateVersion(u32),

    /// The key-record source failed to provide a version.
    #[error("Failed to read key version {version}: {source}")]
    Source {
        /// The version being read.
        version: u32,
        /// The reader's error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// RSA primitive failure, passed through unchanged.
    #[cfg(feature = "rsa")]
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    /// DSA primitive failure, passed through unchanged.
    #[cfg(feature = "dsa")]
    #[error("DSA error: {0}")]
    Dsa(#[from] dsa::signature::Error),

    /// Generic cryptographic error (e.g. the random source failed).
    /// Intentionally vague for security.
    #[error("Cryptographic operation failed")]
    CryptoError,
}

/// Result type alias for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(KeyError::InvalidKeySize.to_string(), "Invalid key size");
        assert_eq!(KeyError::ShortCiphertext.to_string(), "Ciphertext too short");
        assert_eq!(KeyError::InvalidSignature.to_string(), "Invalid signature");
        assert_eq!(KeyError::InvalidPadding.to_string(), "Invalid padding");
        assert_eq!(
            KeyError::UnsupportedMode("CTR".to_string()).to_string(),
            "Unsupported cipher mode: CTR"
        );
        assert_eq!(
            KeyError::DuplicateVersion(3).to_string(),
            "Duplicate key version 3"
        );
    }

    #[test]
    fn test_source_error_keeps_cause() {
        use std::error::Error as _;

        let err = KeyError::Source {
            version: 7,
            source: "disk on fire".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read key version 7: disk on fire"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let debug_str = format!("{:?}", KeyError::MalformedPack);
        assert!(debug_str.contains("MalformedPack"));
    }
}
