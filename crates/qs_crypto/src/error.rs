use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// Malformed recipient public key, or the primitive rejected the payload.
    #[error("Room key wrapping failed")]
    Wrap,

    /// Opaque by design: wrong key, corrupted bytes and tampering must be
    /// indistinguishable to the caller.
    #[error("Room key unwrapping failed")]
    Unwrap,

    #[error("Message encryption failed")]
    Encrypt,

    #[error("Message decryption failed (authentication tag mismatch — possible tampering)")]
    Decrypt,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
