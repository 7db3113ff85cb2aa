//! Core key material types and operations.
//!
//! - [`keytype`] - Key type descriptors and the size table
//! - [`error`] - Error types for key operations
//! - [`header`] - Envelope header generation and parsing
//! - [`operations`] - Key IDs, padding and length-prefixed packing
//! - [`record`] - JSON key record schemas and web-safe base64
//! - [`types`] - Concrete key types and capability traits
//! - [`loader`] - Versioned key loading

pub mod error;
pub mod header;
pub mod keytype;
pub mod loader;
pub mod operations;
pub mod record;
pub mod types;

// Re-export commonly used items
pub use error::{KeyError, KeyResult};
pub use keytype::KeyType;
