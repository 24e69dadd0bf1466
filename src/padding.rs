//! PKCS#7 block-alignment padding.
//!
//! `pad` always appends between 1 and `block_size` bytes, each holding the
//! padding length, so an already aligned input gains a full block.
//!
//! `unpad` only range-checks the final length byte. It does not confirm that
//! every trailing byte carries the same value.

use crate::error::{Result, Web3DataError};

/// Extend `data` to a multiple of `block_size` using PKCS#7.
///
/// # Panics
/// If `block_size` is outside `1..=255`; the length byte could not represent it.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        (1..=255).contains(&block_size),
        "block size {block_size} does not fit in one byte"
    );

    let padding = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + padding);
    padded.extend_from_slice(data);
    padded.resize(data.len() + padding, padding as u8);
    padded
}

/// Strip PKCS#7 padding, returning the original prefix.
pub fn unpad(data: &[u8]) -> Result<&[u8]> {
    let last = *data.last().ok_or(Web3DataError::Padding)?;
    let padding = usize::from(last);

    if padding == 0 || padding > data.len() {
        return Err(Web3DataError::Padding);
    }

    Ok(&data[..data.len() - padding])
}
