//! Key generation, encoding, and storage.
//!
//! This module owns two responsibilities:
//! 1. Producing 256-bit AES keys from the system CSPRNG.
//! 2. Moving key material between memory and its on-disk text form: standard
//!    base64 of the 32 raw bytes, in a file only the owner can read.
//!
//! `decode` is the only gate between untrusted key text and the cipher. It
//! rejects anything that does not decode to exactly `KEY_LEN` bytes.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{self, KEY_BITS, KEY_LEN};
use crate::error::{Result, Web3DataError};
use crate::fsio;

/// Directory used when `genkey` is given no output path.
pub const DEFAULT_SECRETS_DIR: &str = ".secrets";

/// A 256-bit AES key.
///
/// - Not `Clone`. Cannot be duplicated without explicit conversion.
/// - Zeroised on drop.
/// - `Debug` never prints the bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    bytes: [u8; KEY_LEN],
}

impl AesKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Borrow the raw key bytes for use in encrypt/decrypt operations.
    ///
    /// `pub(crate)` — raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesKey(<redacted>)")
    }
}

/// Generate a fresh key from the system CSPRNG. Performs no I/O.
pub fn generate() -> Result<AesKey> {
    let bytes = crypto::random_array::<KEY_LEN>()?;
    Ok(AesKey::from_bytes(bytes))
}

/// Encode a key as standard, padded base64.
pub fn encode(key: &AesKey) -> String {
    STANDARD.encode(key.as_bytes())
}

/// Decode key text produced by `encode`.
///
/// Surrounding whitespace, such as the trailing newline an editor adds, is
/// ignored.
pub fn decode(text: &str) -> Result<AesKey> {
    let raw = Zeroizing::new(
        STANDARD
            .decode(text.trim())
            .map_err(|e| Web3DataError::KeyFormat(format!("invalid base64: {e}")))?,
    );

    let bytes: [u8; KEY_LEN] = raw.as_slice().try_into().map_err(|_| {
        Web3DataError::KeyFormat(format!("expected {KEY_LEN} bytes, got {}", raw.len()))
    })?;
    Ok(AesKey::from_bytes(bytes))
}

/// Default key location: `.secrets/aes-key-256.b64` under the working directory.
pub fn default_key_path() -> PathBuf {
    Path::new(DEFAULT_SECRETS_DIR).join(format!("aes-key-{KEY_BITS}.b64"))
}

/// Write the encoded key to `path` with owner-only permissions.
///
/// Missing parent directories are created owner-only as well. An existing
/// file at `path` is replaced atomically.
pub fn persist(key: &AesKey, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fsio::create_dir_all(parent, fsio::OWNER_RWX)?;
    }

    let encoded = Zeroizing::new(encode(key));
    fsio::write_atomic(path, encoded.as_bytes(), fsio::OWNER_RW)?;

    info!(path = %path.display(), "persisted key");
    Ok(())
}

/// Read and decode a key file.
pub fn load(path: &Path) -> Result<AesKey> {
    let raw = Zeroizing::new(fsio::read(path, "failed to read key file")?);
    let text = std::str::from_utf8(&raw)
        .map_err(|_| Web3DataError::KeyFormat("key file is not valid UTF-8".into()))?;
    let key = decode(text)?;

    debug!(path = %path.display(), "loaded key");
    Ok(key)
}
