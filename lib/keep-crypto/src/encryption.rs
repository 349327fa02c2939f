use chacha20poly1305::aead::{Aead, Nonce};
use chacha20poly1305::{AeadCore, ChaCha20Poly1305, KeyInit};
use secrecy::{ExposeSecret, SecretSlice, SecretString};

use crate::utilities::get_rng;

/// Required key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Largest accepted plaintext (16 MiB).
pub const MAX_PLAINTEXT_LENGTH: usize = 16 * 1024 * 1024;

const NONCE_LENGTH: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("invalid key length: expected {KEY_LENGTH} bytes")]
    InvalidKeyLength,
    #[error("plaintext of {0} bytes exceeds the {MAX_PLAINTEXT_LENGTH} byte limit")]
    PlaintextTooLarge(usize),
    #[error("ciphertext is malformed")]
    MalformedCiphertext,
    #[error("crypto error: {0}")]
    Crypto(String),
}

fn cipher(encryption_key: &SecretSlice<u8>) -> Result<ChaCha20Poly1305, EncryptionError> {
    let key = encryption_key.expose_secret();
    if key.len() != KEY_LENGTH {
        return Err(EncryptionError::InvalidKeyLength);
    }

    ChaCha20Poly1305::new_from_slice(key).map_err(|_| EncryptionError::InvalidKeyLength)
}

/// Encrypts `data`, output layout is `nonce || ciphertext || tag`.
pub fn encrypt_data(
    data: &SecretSlice<u8>,
    encryption_key: &SecretSlice<u8>,
) -> Result<Vec<u8>, EncryptionError> {
    let plaintext = data.expose_secret();
    if plaintext.len() > MAX_PLAINTEXT_LENGTH {
        return Err(EncryptionError::PlaintextTooLarge(plaintext.len()));
    }

    let cipher = cipher(encryption_key)?;
    let nonce = ChaCha20Poly1305::generate_nonce(get_rng());

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| EncryptionError::Crypto("failed to encrypt".to_owned()))?;

    let mut result = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

pub fn decrypt_data(
    data: &[u8],
    encryption_key: &SecretSlice<u8>,
) -> Result<SecretSlice<u8>, EncryptionError> {
    if data.len() <= NONCE_LENGTH {
        return Err(EncryptionError::MalformedCiphertext);
    }

    let cipher = cipher(encryption_key)?;
    let (nonce, ciphertext) = data.split_at(NONCE_LENGTH);
    let nonce = Nonce::<ChaCha20Poly1305>::from_slice(nonce);

    // the aead error is opaque, nothing from the input is echoed back
    cipher
        .decrypt(nonce, ciphertext)
        .map(SecretSlice::from)
        .map_err(|_| EncryptionError::Crypto("failed to decrypt".to_owned()))
}

pub fn encrypt_string(
    data: &SecretString,
    encryption_key: &SecretSlice<u8>,
) -> Result<Vec<u8>, EncryptionError> {
    encrypt_data(
        &SecretSlice::from(data.expose_secret().as_bytes().to_vec()),
        encryption_key,
    )
}

pub fn decrypt_string(
    data: &[u8],
    encryption_key: &SecretSlice<u8>,
) -> Result<SecretString, EncryptionError> {
    let decrypted = decrypt_data(data, encryption_key)?;
    let text = String::from_utf8(decrypted.expose_secret().to_vec())
        .map_err(|_| EncryptionError::Crypto("decrypted data is not valid UTF-8".to_owned()))?;
    Ok(SecretString::from(text))
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::utilities::generate_random_bytes;

    fn key() -> SecretSlice<u8> {
        SecretSlice::from(generate_random_bytes::<KEY_LENGTH>().to_vec())
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4096)]
    #[case(MAX_PLAINTEXT_LENGTH)]
    fn test_encrypt_decrypt_round_trip(#[case] size: usize) {
        let key = key();
        let plaintext: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();

        let ciphertext = encrypt_data(&SecretSlice::from(plaintext.clone()), &key).unwrap();
        let decrypted = decrypt_data(&ciphertext, &key).unwrap();

        assert_eq!(decrypted.expose_secret(), plaintext.as_slice());
    }

    #[test]
    fn test_encrypt_twice_yields_different_ciphertext() {
        let key = key();
        let secret = SecretString::from("hunter2".to_owned());

        let a = encrypt_string(&secret, &key).unwrap();
        let b = encrypt_string(&secret, &key).unwrap();

        assert_ne!(a, b);
        assert_eq!(decrypt_string(&a, &key).unwrap().expose_secret(), "hunter2");
    }

    #[test]
    fn test_plaintext_too_large() {
        let result = encrypt_data(
            &SecretSlice::from(vec![0u8; MAX_PLAINTEXT_LENGTH + 1]),
            &key(),
        );
        assert!(matches!(result, Err(EncryptionError::PlaintextTooLarge(_))));
    }

    #[test]
    fn test_decrypt_with_foreign_key_fails() {
        let ciphertext = encrypt_string(&SecretString::from("secret".to_owned()), &key()).unwrap();

        let error = decrypt_string(&ciphertext, &key()).unwrap_err();
        assert!(matches!(error, EncryptionError::Crypto(_)));
        assert!(!error.to_string().contains("secret"));
    }

    #[test]
    fn test_decrypt_corrupted_ciphertext_fails() {
        let key = key();
        let mut ciphertext = encrypt_string(&SecretString::from("secret".to_owned()), &key).unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;

        assert!(decrypt_data(&ciphertext, &key).is_err());
        assert!(matches!(
            decrypt_data(&ciphertext[..4], &key),
            Err(EncryptionError::MalformedCiphertext)
        ));
    }

    #[test]
    fn test_invalid_key_length() {
        let short_key = SecretSlice::from(vec![0u8; 16]);
        assert!(matches!(
            encrypt_data(&SecretSlice::from(vec![1u8]), &short_key),
            Err(EncryptionError::InvalidKeyLength)
        ));
    }
}
