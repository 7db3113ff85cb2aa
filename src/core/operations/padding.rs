//! PKCS#5/7 block padding.

use crate::core::error::{KeyError, KeyResult};

/// Pads `data` to a multiple of `block_size`.
///
/// A full block of padding is added when `data` is already aligned, so the
/// output is never empty. `block_size` must be in `1..=255`.
#[must_use]
pub fn pkcs5_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&block_size));

    let pad = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + pad);
    padded.extend_from_slice(data);
    // pad <= block_size <= 255
    padded.resize(data.len() + pad, pad as u8);
    padded
}

/// Validates and strips PKCS#5/7 padding.
///
/// # Errors
///
/// Returns `KeyError::InvalidPadding` if the input is empty, not aligned to
/// `block_size`, or the trailing bytes are not a valid pad.
pub fn pkcs5_unpad(data: &[u8], block_size: usize) -> KeyResult<&[u8]> {
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(KeyError::InvalidPadding);
    }

    let pad = usize::from(data[data.len() - 1]);
    if pad == 0 || pad > block_size {
        return Err(KeyError::InvalidPadding);
    }

    let (body, tail) = data.split_at(data.len() - pad);
    if tail.iter().any(|&b| usize::from(b) != pad) {
        return Err(KeyError::InvalidPadding);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_partial_block() {
        let padded = pkcs5_pad(b"hello world", 16);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[11..], &[5u8; 5]);
    }

    #[test]
    fn test_pad_aligned_adds_full_block() {
        let padded = pkcs5_pad(&[0x41; 16], 16);
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[16..], &[16u8; 16]);
    }

    #[test]
    fn test_pad_empty() {
        assert_eq!(pkcs5_pad(&[], 8), vec![8u8; 8]);
    }

    #[test]
    fn test_unpad_roundtrip() -> KeyResult<()> {
        for len in 0..40 {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let padded = pkcs5_pad(&data, 16);
            assert_eq!(pkcs5_unpad(&padded, 16)?, data.as_slice());
        }
        Ok(())
    }

    #[test]
    fn test_unpad_rejects_zero_pad() {
        let mut block = [0x41u8; 16];
        block[15] = 0;
        assert!(matches!(
            pkcs5_unpad(&block, 16),
            Err(KeyError::InvalidPadding)
        ));
    }

    #[test]
    fn test_unpad_rejects_oversized_pad() {
        let mut block = [0x41u8; 16];
        block[15] = 17;
        assert!(matches!(
            pkcs5_unpad(&block, 16),
            Err(KeyError::InvalidPadding)
        ));
    }

    #[test]
    fn test_unpad_rejects_inconsistent_pad() {
        let mut block = [0x03u8; 16];
        block[13] = 0x02;
        assert!(matches!(
            pkcs5_unpad(&block, 16),
            Err(KeyError::InvalidPadding)
        ));
    }

    #[test]
    fn test_unpad_rejects_unaligned() {
        assert!(pkcs5_unpad(&[1u8; 15], 16).is_err());
        assert!(pkcs5_unpad(&[], 16).is_err());
    }
}
