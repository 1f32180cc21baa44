//! Authenticated message encryption
//!
//! AES-256-GCM with a detached random 96-bit nonce.
//! Key size: 32 bytes.  Nonce: 12 bytes (fresh per call).  Tag: 16 bytes,
//! appended to the ciphertext.
//!
//! The nonce travels next to the ciphertext (`ivB64` / `ciphertextB64` in
//! the wire envelope, see `qs_proto::message`) rather than prepended, so
//! both pieces stay independently addressable.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// GCM nonce length, fixed at 96 bits.
pub const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` under a 32-byte room key with a fresh random nonce.
/// Stateless; never reuses a nonce because every call draws new randomness.
pub fn encrypt(
    key: &[u8; 32],
    plaintext: &[u8],
) -> Result<([u8; NONCE_LEN], Vec<u8>), CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Encrypt)?;

    let nonce = Aes256Gcm::generate_nonce(&mut AeadOsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    let mut iv = [0u8; NONCE_LEN];
    iv.copy_from_slice(nonce.as_slice());
    Ok((iv, ciphertext))
}

/// Decrypt ciphertext+tag.  Hard failure on tag mismatch — never returns
/// partial plaintext.  A non-12-byte `iv` is a programmer error and fails
/// fast before any cryptographic work.
pub fn decrypt(
    key: &[u8; 32],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if iv.len() != NONCE_LEN {
        return Err(CryptoError::InvalidKey(format!(
            "Nonce must be {NONCE_LEN} bytes, got {}",
            iv.len()
        )));
    }
    let nonce = Nonce::from_slice(iv);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Decrypt)?;
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::Decrypt)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::OsRng, RngCore};

    fn random_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        key
    }

    #[test]
    fn roundtrip() {
        let key = random_key();
        let (iv, ct) = encrypt(&key, b"hello").unwrap();
        let pt = decrypt(&key, &iv, &ct).unwrap();
        assert_eq!(pt.as_slice(), b"hello");
    }

    #[test]
    fn wrong_key_fails() {
        let key = random_key();
        let other = random_key();
        let (iv, ct) = encrypt(&key, b"hello").unwrap();
        let err = decrypt(&other, &iv, &ct).unwrap_err();
        assert!(matches!(err, CryptoError::Decrypt));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = random_key();
        let (iv, mut ct) = encrypt(&key, b"hello").unwrap();
        ct[0] ^= 0x01;
        assert!(matches!(
            decrypt(&key, &iv, &ct).unwrap_err(),
            CryptoError::Decrypt
        ));
    }

    #[test]
    fn fresh_nonce_every_call() {
        let key = random_key();
        let (iv1, _) = encrypt(&key, b"same plaintext").unwrap();
        let (iv2, _) = encrypt(&key, b"same plaintext").unwrap();
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn bad_nonce_length_fails_fast() {
        let key = random_key();
        let (_, ct) = encrypt(&key, b"hello").unwrap();
        let err = decrypt(&key, &[0u8; 8], &ct).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }
}
