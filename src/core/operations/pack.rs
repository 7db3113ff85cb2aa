//! Length-prefixed packing of multiple byte buffers.
//!
//! Layout: a 4-byte big-endian buffer count, then for each buffer a 4-byte
//! big-endian length followed by its bytes. Used to export an AES key
//! together with its MAC key as a single blob.

use crate::core::error::{KeyError, KeyResult};

const LEN_SIZE: usize = 4;

/// Packs the buffers into one length-prefixed blob.
///
/// # Errors
///
/// Returns `KeyError::MalformedPack` if a buffer (or the buffer count) does
/// not fit in a 32-bit length.
pub fn len_prefix_pack(buffers: &[&[u8]]) -> KeyResult<Vec<u8>> {
    let total: usize = buffers.iter().map(|b| LEN_SIZE + b.len()).sum();
    let mut out = Vec::with_capacity(LEN_SIZE + total);

    let count = u32::try_from(buffers.len()).map_err(|_| KeyError::MalformedPack)?;
    out.extend_from_slice(&count.to_be_bytes());

    for buffer in buffers {
        let len = u32::try_from(buffer.len()).map_err(|_| KeyError::MalformedPack)?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(buffer);
    }

    Ok(out)
}

/// Recovers the buffers packed by [`len_prefix_pack`].
///
/// # Errors
///
/// Returns `KeyError::MalformedPack` if the input is truncated, declares
/// more data than it holds, or has trailing bytes.
pub fn len_prefix_unpack(packed: &[u8]) -> KeyResult<Vec<Vec<u8>>> {
    let (count, mut rest) = read_len(packed)?;

    // Every buffer needs at least its length prefix
    if count > rest.len() / LEN_SIZE {
        return Err(KeyError::MalformedPack);
    }

    let mut buffers = Vec::with_capacity(count);
    for _ in 0..count {
        let (len, tail) = read_len(rest)?;
        if len > tail.len() {
            return Err(KeyError::MalformedPack);
        }
        let (buffer, tail) = tail.split_at(len);
        buffers.push(buffer.to_vec());
        rest = tail;
    }

    if !rest.is_empty() {
        return Err(KeyError::MalformedPack);
    }

    Ok(buffers)
}

fn read_len(input: &[u8]) -> KeyResult<(usize, &[u8])> {
    if input.len() < LEN_SIZE {
        return Err(KeyError::MalformedPack);
    }
    let (prefix, rest) = input.split_at(LEN_SIZE);
    let mut len = [0u8; LEN_SIZE];
    len.copy_from_slice(prefix);
    let len = usize::try_from(u32::from_be_bytes(len)).map_err(|_| KeyError::MalformedPack)?;
    Ok((len, rest))
}
