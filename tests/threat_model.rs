use web3data::crypto::{blob_len, IV_LEN, KEY_LEN};
use web3data::keys;
use web3data::{decrypt, encrypt, Cipher, Web3DataError};

#[test]
fn test_iv_freshness() {
    // Threat: IV reuse leaks plaintext equality.
    // Goal: identical plaintext under the same key never repeats IV or ciphertext.

    let key = keys::generate().unwrap();
    let cipher = Cipher::new(key);

    let a = cipher.encrypt(b"same plaintext").unwrap();
    let b = cipher.encrypt(b"same plaintext").unwrap();

    assert_ne!(&a[..IV_LEN], &b[..IV_LEN], "IV repeated across encryptions");
    assert_ne!(&a[IV_LEN..], &b[IV_LEN..], "ciphertext repeated across encryptions");
}

#[test]
fn test_wrong_key_rejected() {
    // Threat: decrypting with the wrong key.
    // Without an authentication tag, the padding check is the only signal. A
    // random wrong key passes it roughly one time in sixteen, so try several
    // and require that none recover the plaintext and most fail on padding.

    let plaintext = b"hello world";
    let right = keys::generate().unwrap();
    let blob = Cipher::new(right).encrypt(plaintext).unwrap();

    let mut padding_failures = 0;
    for _ in 0..8 {
        let wrong = Cipher::new(keys::generate().unwrap());
        match wrong.decrypt(&blob) {
            Err(Web3DataError::Padding) => padding_failures += 1,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(recovered) => assert_ne!(recovered, plaintext),
        }
    }
    assert!(padding_failures > 0, "no wrong key was rejected");
}

#[test]
fn test_tampered_padding_byte_rejected() {
    // Threat: blob modified in storage.
    // Flipping bits in the block before the last one flips the same bits in
    // the last plaintext block. Forcing the decrypted length byte past the
    // block must surface as a padding failure, not garbage output.

    let key = [0x42u8; KEY_LEN];
    let blob = encrypt(b"hello world", &key).unwrap();
    assert_eq!(blob.len(), 32);

    // "hello world" carries five bytes of 0x05 padding. Turn the last into 0x20.
    let mut tampered = blob.clone();
    tampered[IV_LEN - 1] ^= 0x05 ^ 0x20;

    assert!(matches!(decrypt(&tampered, &key), Err(Web3DataError::Padding)));
}

#[test]
fn test_cbc_malleability_is_not_detected() {
    // Known weakness: there is no integrity check. Flipping an IV bit flips
    // the matching plaintext bit and decryption still succeeds.

    let key = [0x42u8; KEY_LEN];
    let mut blob = encrypt(b"hello world", &key).unwrap();
    blob[0] ^= b'h' ^ b'j';

    assert_eq!(decrypt(&blob, &key).unwrap(), b"jello world");
}

#[test]
fn test_structural_corruption_rejected() {
    let key = [0u8; KEY_LEN];
    let blob = encrypt(b"some data", &key).unwrap();

    assert!(matches!(
        decrypt(&blob[..10], &key),
        Err(Web3DataError::TruncatedInput { len: 10 })
    ));
    assert!(matches!(
        decrypt(&blob[..blob.len() - 1], &key),
        Err(Web3DataError::MisalignedCiphertext { len: 15 })
    ));
}

#[test]
fn test_short_key_never_reaches_cipher() {
    let key = [0u8; 16];
    assert!(matches!(
        encrypt(b"data", &key),
        Err(Web3DataError::InvalidKey { len: 16 })
    ));
    assert!(matches!(
        decrypt(&[0u8; 32], &key),
        Err(Web3DataError::InvalidKey { len: 16 })
    ));
    assert_eq!(blob_len(4), 32);
}
