//! Error types for web3data.
//!
//! Every variant is a distinct failure mode of the encryption pipeline or of
//! the blob transfer glue around it. Messages are deliberately terse: they
//! say *what* failed and never echo key material.

use std::path::PathBuf;

use thiserror::Error;

/// The single error type for all web3data operations.
#[derive(Debug, Error)]
pub enum Web3DataError {
    /// The system's random number generator failed to produce bytes.
    #[error("randomness source failed")]
    RandomSource,

    /// A raw key of the wrong length was handed to the cipher.
    #[error("invalid AES key length: {len} bytes")]
    InvalidKey { len: usize },

    /// Key text was not valid base64, or did not decode to exactly 32 bytes.
    #[error("malformed key: {0}")]
    KeyFormat(String),

    /// The block cipher context could not be constructed.
    #[error("failed to create cipher")]
    CipherInit,

    /// The blob is shorter than one IV.
    #[error("ciphertext too short: {len} bytes")]
    TruncatedInput { len: usize },

    /// The ciphertext body is not a whole number of blocks.
    #[error("ciphertext is not a multiple of the block size: {len} bytes")]
    MisalignedCiphertext { len: usize },

    /// The trailing padding length byte was out of range. Wrong key and
    /// corrupted ciphertext both surface here and cannot be told apart.
    #[error("invalid padding")]
    Padding,

    /// A filesystem operation failed.
    #[error("{context} {}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request itself could not be completed.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// The remote gateway answered with a non-success status.
    #[error("remote returned {status}: {body}")]
    Remote { status: u16, body: String },
}

impl Web3DataError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Process exit status the command-line front end reports for this error.
    ///
    /// `2` is left to the argument parser for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 3,
            Self::InvalidKey { .. } | Self::KeyFormat(_) => 4,
            Self::TruncatedInput { .. } | Self::MisalignedCiphertext { .. } | Self::Padding => 5,
            Self::RandomSource | Self::CipherInit => 6,
            Self::Transfer(_) | Self::Remote { .. } => 7,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Web3DataError>;
