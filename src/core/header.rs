//! Envelope header construction and parsing.
//!
//! Every symmetric and RSA ciphertext starts with a fixed 5-byte header:
//! one format-version byte followed by the 4-byte ID of the key that
//! produced it. Signatures and MAC tags carry no header.

use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::id::{KeyId, KEY_ID_SIZE};

/// Envelope format version.
pub const FORMAT_VERSION: u8 = 0;

/// Total header length in bytes.
pub const HEADER_LENGTH: usize = 1 + KEY_ID_SIZE;

/// Constructs an envelope header for the given key ID.
#[must_use]
pub fn make_header(key_id: &KeyId) -> [u8; HEADER_LENGTH] {
    let mut header = [0u8; HEADER_LENGTH];
    header[0] = FORMAT_VERSION;
    header[1..].copy_from_slice(key_id.as_bytes());
    header
}

/// Splits an envelope into its key ID and the bytes following the header.
///
/// # Errors
///
/// Returns `KeyError::ShortCiphertext` if the input is shorter than a header.
/// Returns `KeyError::InvalidHeader` if the format version is unknown.
pub fn parse_header(envelope: &[u8]) -> KeyResult<(KeyId, &[u8])> {
    if envelope.len() < HEADER_LENGTH {
        return Err(KeyError::ShortCiphertext);
    }

    let (header, payload) = envelope.split_at(HEADER_LENGTH);
    if header[0] != FORMAT_VERSION {
        return Err(KeyError::InvalidHeader);
    }

    let mut id = [0u8; KEY_ID_SIZE];
    id.copy_from_slice(&header[1..]);

    Ok((KeyId::new(id), payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_header() {
        let header = make_header(&KeyId::new([1, 2, 3, 4]));
        assert_eq!(header, [0, 1, 2, 3, 4]);
        assert_eq!(header.len(), HEADER_LENGTH);
    }

    #[test]
    fn test_parse_header() -> KeyResult<()> {
        let (id, payload) = parse_header(&[0, 9, 8, 7, 6, 0xaa, 0xbb])?;
        assert_eq!(id, KeyId::new([9, 8, 7, 6]));
        assert_eq!(payload, &[0xaa, 0xbb]);
        Ok(())
    }

    #[test]
    fn test_parse_header_only() -> KeyResult<()> {
        let (_, payload) = parse_header(&[0, 1, 1, 1, 1])?;
        assert!(payload.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_header_short() {
        assert!(matches!(
            parse_header(&[0, 1, 2]),
            Err(KeyError::ShortCiphertext)
        ));
        assert!(matches!(parse_header(&[]), Err(KeyError::ShortCiphertext)));
    }

    #[test]
    fn test_parse_header_bad_version() {
        assert!(matches!(
            parse_header(&[1, 0, 0, 0, 0]),
            Err(KeyError::InvalidHeader)
        ));
    }
}
