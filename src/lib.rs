//! # web3data
//!
//! Symmetric file encryption for data headed to decentralised storage.
//!
//! A file is encrypted with AES-256-CBC under a 256-bit key into a
//! self-contained blob:
//!
//! ```text
//! [ IV (16 bytes) ][ ciphertext, PKCS#7 padded (N * 16 bytes) ]
//! ```
//!
//! No header, no length field, and no authentication tag. The format offers
//! confidentiality only: a blob can be tampered with undetected. See
//! `crypto` for the consequences.
//!
//! Keys are stored as base64 text in owner-only files. Blobs can be moved to
//! IPFS or Arweave through the `transfer` module.

pub mod crypto;
pub mod error;
pub mod fsio;
pub mod keys;
pub mod padding;
pub mod transfer;

use std::path::Path;

use tracing::info;

pub use crypto::{decrypt, encrypt, Cipher};
pub use error::{Result, Web3DataError};
pub use keys::AesKey;

/// Encrypt `input` under the key stored at `key_path`, writing the blob to `output`.
///
/// Returns the number of blob bytes written.
pub fn encrypt_file(input: &Path, output: &Path, key_path: &Path) -> Result<usize> {
    let cipher = Cipher::new(keys::load(key_path)?);
    let plaintext = fsio::read(input, "failed to read input file")?;

    let blob = cipher.encrypt(&plaintext)?;
    fsio::write_atomic(output, &blob, fsio::OWNER_RW)?;

    info!(input = %input.display(), output = %output.display(), "file encrypted");
    Ok(blob.len())
}

/// Decrypt the blob at `input` with the key stored at `key_path`, writing the plaintext to `output`.
///
/// Returns the number of plaintext bytes written. Nothing is written when
/// decryption fails.
pub fn decrypt_file(input: &Path, output: &Path, key_path: &Path) -> Result<usize> {
    let cipher = Cipher::new(keys::load(key_path)?);
    let blob = fsio::read(input, "failed to read input file")?;

    let plaintext = cipher.decrypt(&blob)?;
    fsio::write_atomic(output, &plaintext, fsio::OWNER_RW)?;

    info!(input = %input.display(), output = %output.display(), "file decrypted");
    Ok(plaintext.len())
}

/// Generate a key and persist it to `output`, or to `keys::default_key_path()` when `None`.
///
/// Returns the path the key was written to.
pub fn generate_key_file(output: Option<&Path>) -> Result<std::path::PathBuf> {
    let path = output.map_or_else(keys::default_key_path, Path::to_path_buf);
    let key = keys::generate()?;
    keys::persist(&key, &path)?;
    Ok(path)
}
