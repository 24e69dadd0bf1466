//! Low-level cryptographic operations.
//!
//! All encryption and decryption in the crate goes through the functions
//! exposed here. Randomness comes from `ring::rand::SystemRandom`; the block
//! cipher and chaining mode come from the RustCrypto `aes` and `cbc` crates.
//!
//! Primitive choices:
//! - **Cipher**: AES-256 in CBC mode, PKCS#7 padding (see `padding`)
//! - **IV**: 128-bit (16 bytes), generated fresh per operation
//! - **Key size**: 256 bits (32 bytes)
//!
//! There is no authentication tag. Anyone able to modify a stored blob can
//! flip plaintext bits in the following block, and the observable padding
//! failure in `decrypt` is a classic padding oracle. Callers that need
//! integrity must add it outside this format.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

use crate::error::{Result, Web3DataError};
use crate::keys::AesKey;
use crate::padding;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of an AES key in bits.
pub const KEY_BITS: usize = 256;

/// Size of an AES key in bytes.
pub const KEY_LEN: usize = KEY_BITS / 8;

/// Width of one AES block in bytes.
pub const BLOCK_LEN: usize = 16;

/// Size of the CBC initialisation vector in bytes. Always one block.
pub const IV_LEN: usize = BLOCK_LEN;

/// Fill a fixed-size buffer from the system CSPRNG.
pub(crate) fn random_array<const N: usize>() -> Result<[u8; N]> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; N];
    rng.fill(&mut buf).map_err(|_| Web3DataError::RandomSource)?;
    Ok(buf)
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN {
        return Err(Web3DataError::InvalidKey { len: key.len() });
    }
    Ok(())
}

/// Encrypt a plaintext with AES-256-CBC under a fresh random IV.
///
/// # Layout of returned bytes
/// ```text
/// [ IV (16 bytes) ][ ciphertext (N * 16 bytes) ]
/// ```
///
/// The ciphertext is always at least one block long: an aligned or empty
/// plaintext still gains a full block of padding.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(key)?;
    let iv = random_array::<IV_LEN>()?;
    encrypt_with_iv(plaintext, key, &iv)
}

/// Encrypt under a caller-chosen IV.
///
/// Reusing an IV with the same key leaks plaintext equality, so this stays
/// inside the crate. It exists so that known-answer tests can pin the output.
pub(crate) fn encrypt_with_iv(plaintext: &[u8], key: &[u8], iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
    check_key(key)?;
    let padded = padding::pad(plaintext, BLOCK_LEN);

    let encryptor = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| Web3DataError::CipherInit)?;
    let ciphertext = encryptor.encrypt_padded_vec_mut::<NoPadding>(&padded);

    let mut output = Vec::with_capacity(IV_LEN + ciphertext.len());
    output.extend_from_slice(iv);
    output.extend_from_slice(&ciphertext);

    debug!(plaintext_len = plaintext.len(), blob_len = output.len(), "encrypted payload");
    Ok(output)
}

/// Decrypt a blob in the layout produced by `encrypt`.
///
/// A wrong key usually shows up as `Web3DataError::Padding`, but roughly one
/// wrong key in sixteen yields an in-range final byte and returns garbage
/// instead. Nothing here can tell the two apart.
pub fn decrypt(blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(key)?;

    if blob.len() < IV_LEN {
        return Err(Web3DataError::TruncatedInput { len: blob.len() });
    }
    let (iv, ciphertext) = blob.split_at(IV_LEN);

    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(Web3DataError::MisalignedCiphertext {
            len: ciphertext.len(),
        });
    }
    if ciphertext.is_empty() {
        return Err(Web3DataError::Padding);
    }

    let decryptor = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| Web3DataError::CipherInit)?;
    let decrypted = decryptor
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| Web3DataError::MisalignedCiphertext {
            len: ciphertext.len(),
        })?;

    let plaintext = padding::unpad(&decrypted)?.to_vec();
    debug!(blob_len = blob.len(), plaintext_len = plaintext.len(), "decrypted payload");
    Ok(plaintext)
}

/// A key bound to the encrypt/decrypt pipeline.
///
/// Holds nothing but the immutable key, so one `Cipher` can be shared across
/// threads and every call still draws its own IV.
pub struct Cipher {
    key: AesKey,
}

impl Cipher {
    /// Take ownership of `key`.
    pub fn new(key: AesKey) -> Self {
        Self { key }
    }

    /// Encrypt under the held key. See [`encrypt`].
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt(plaintext, self.key.as_bytes())
    }

    /// Decrypt under the held key. See [`decrypt`].
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>> {
        decrypt(blob, self.key.as_bytes())
    }
}

/// Length of the blob `encrypt` produces for a plaintext of `plaintext_len` bytes.
pub fn blob_len(plaintext_len: usize) -> usize {
    IV_LEN + (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    // NIST SP 800-38A, F.2.5 CBC-AES256.Encrypt
    #[test]
    fn matches_nist_cbc_vector() {
        let key = hex("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let iv: [u8; IV_LEN] = hex("000102030405060708090a0b0c0d0e0f").try_into().unwrap();
        let plaintext = hex(concat!(
            "6bc1bee22e409f96e93d7e117393172a",
            "ae2d8a571e03ac9c9eb76fac45af8e51",
            "30c81c46a35ce411e5fbc1191a0a52ef",
            "f69f2445df4f9b17ad2b417be66c3710",
        ));
        let expected = hex(concat!(
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6",
            "9cfc4e967edb808d679f777bc6702c7d",
            "39f23369a9d9bacfa530e26304231461",
            "b2eb05e2c39be9fcda6c19078c6a9d1b",
        ));

        let blob = encrypt_with_iv(&plaintext, &key, &iv).unwrap();
        assert_eq!(&blob[..IV_LEN], &iv);
        // 64 aligned bytes gain one padding block; the CBC prefix is unaffected.
        assert_eq!(blob.len(), IV_LEN + 80);
        assert_eq!(&blob[IV_LEN..IV_LEN + 64], &expected[..]);

        assert_eq!(decrypt(&blob, &key).unwrap(), plaintext);
    }

    #[test]
    fn fixed_iv_is_deterministic() {
        let key = [9u8; KEY_LEN];
        let iv = [1u8; IV_LEN];
        let a = encrypt_with_iv(b"same input", &key, &iv).unwrap();
        let b = encrypt_with_iv(b"same input", &key, &iv).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn roundtrip_across_block_boundaries() {
        let key = random_array::<KEY_LEN>().unwrap();
        for len in [0usize, 1, 15, 16, 17, 31, 32, 33, 100, 4096] {
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let blob = encrypt(&plaintext, &key).unwrap();
            assert_eq!(blob.len(), blob_len(len), "length {len}");
            assert_eq!(decrypt(&blob, &key).unwrap(), plaintext, "length {len}");
        }
    }

    #[test]
    fn blob_lengths() {
        assert_eq!(blob_len(0), 32);
        assert_eq!(blob_len(11), 32);
        assert_eq!(blob_len(15), 32);
        assert_eq!(blob_len(16), 48);
    }

    #[test]
    fn rejects_short_key() {
        let key = [0u8; 16];
        assert!(matches!(
            encrypt(b"data", &key),
            Err(Web3DataError::InvalidKey { len: 16 })
        ));
        assert!(matches!(
            decrypt(&[0u8; 32], &key),
            Err(Web3DataError::InvalidKey { len: 16 })
        ));
    }

    #[test]
    fn key_is_checked_before_blob_shape() {
        assert!(matches!(
            decrypt(&[0u8; 3], &[0u8; 31]),
            Err(Web3DataError::InvalidKey { len: 31 })
        ));
    }

    #[test]
    fn rejects_truncated_blob() {
        let key = [0u8; KEY_LEN];
        assert!(matches!(
            decrypt(&[0u8; 15], &key),
            Err(Web3DataError::TruncatedInput { len: 15 })
        ));
    }

    #[test]
    fn rejects_misaligned_ciphertext() {
        let key = [0u8; KEY_LEN];
        assert!(matches!(
            decrypt(&[0u8; 40], &key),
            Err(Web3DataError::MisalignedCiphertext { len: 24 })
        ));
    }

    #[test]
    fn iv_only_blob_fails_padding() {
        let key = [0u8; KEY_LEN];
        assert!(matches!(decrypt(&[0u8; IV_LEN], &key), Err(Web3DataError::Padding)));
    }

    #[test]
    fn cipher_wraps_key() {
        let cipher = Cipher::new(AesKey::from_bytes([4u8; KEY_LEN]));
        let blob = cipher.encrypt(b"wrapped").unwrap();
        assert_eq!(cipher.decrypt(&blob).unwrap(), b"wrapped");
    }
}
