use std::fs;

use web3data::crypto::blob_len;
use web3data::{decrypt_file, encrypt_file, generate_key_file, keys, Web3DataError};

#[test]
fn test_encrypt_then_decrypt_files() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join(".secrets").join("aes-key-256.b64");
    let plain = dir.path().join("notes.txt");
    let sealed = dir.path().join("notes.enc");
    let opened = dir.path().join("notes.out");

    let contents = b"web3 payload that spans more than one AES block";
    fs::write(&plain, contents).unwrap();

    assert_eq!(generate_key_file(Some(key_path.as_path())).unwrap(), key_path);

    let written = encrypt_file(&plain, &sealed, &key_path).unwrap();
    assert_eq!(written, blob_len(contents.len()));
    assert_eq!(fs::metadata(&sealed).unwrap().len() as usize, written);
    assert_ne!(fs::read(&sealed).unwrap()[16..], contents[..]);

    let recovered = decrypt_file(&sealed, &opened, &key_path).unwrap();
    assert_eq!(recovered, contents.len());
    assert_eq!(fs::read(&opened).unwrap(), contents);
}

#[test]
fn test_key_file_with_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("key.b64");
    let key = keys::generate().unwrap();
    fs::write(&key_path, format!("{}\n", keys::encode(&key))).unwrap();

    assert_eq!(keys::encode(&keys::load(&key_path).unwrap()), keys::encode(&key));
}

#[test]
fn test_failed_decrypt_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("key.b64");
    let sealed = dir.path().join("bad.enc");
    let opened = dir.path().join("bad.out");

    generate_key_file(Some(key_path.as_path())).unwrap();
    fs::write(&sealed, [0u8; 20]).unwrap();

    let err = decrypt_file(&sealed, &opened, &key_path).unwrap_err();
    assert!(matches!(err, Web3DataError::MisalignedCiphertext { len: 4 }));
    assert!(!opened.exists());
}

#[test]
fn test_malformed_key_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("key.b64");
    let plain = dir.path().join("in.txt");
    fs::write(&plain, b"data").unwrap();

    // 24 bytes: an AES-192 key, not accepted here.
    fs::write(&key_path, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();

    let err = encrypt_file(&plain, &dir.path().join("out.enc"), &key_path).unwrap_err();
    assert!(matches!(err, Web3DataError::KeyFormat(_)));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("key.b64");
    generate_key_file(Some(key_path.as_path())).unwrap();

    let err = encrypt_file(&dir.path().join("absent"), &dir.path().join("o"), &key_path).unwrap_err();
    assert!(matches!(err, Web3DataError::Io { .. }));
}
