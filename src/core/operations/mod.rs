//! Shared envelope and key-identification operations.
//!
//! - [`id`] - Key ID computation (SHA-1 fingerprints)
//! - [`padding`] - PKCS#5/7 block padding
//! - [`pack`] - Length-prefixed multi-buffer packing

pub mod id;
pub mod pack;
pub mod padding;
