//! Backup envelope and payload.
//!
//! Outer envelope (safe to store anywhere, self-describing):
//!   { "version": 1, "saltB64": "...", "ivB64": "...", "ciphertextB64": "..." }
//!
//! Inner payload (exists only in plaintext inside the two endpoints of an
//! export/import, never transmitted in clear):
//!   { "deviceId": "...", "publicKey": "...", "privateKey": "...",
//!     "createdAt": <epoch-ms> }
//!
//! The payload deserialiser rejects unknown and missing fields outright —
//! key material is validated before any cryptographic consumer touches it,
//! never coerced.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ProtoError;

/// Only recognised envelope version.
pub const BACKUP_VERSION: u32 = 1;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

// ── Outer envelope ───────────────────────────────────────────────────────────

/// Passphrase-encrypted, portable export of one device keypair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEnvelope {
    pub version: u32,
    #[serde(rename = "saltB64")]
    pub salt_b64: String,
    #[serde(rename = "ivB64")]
    pub iv_b64: String,
    #[serde(rename = "ciphertextB64")]
    pub ciphertext_b64: String,
}

impl BackupEnvelope {
    pub fn new(salt: &[u8; SALT_LEN], iv: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Self {
        Self {
            version: BACKUP_VERSION,
            salt_b64: STANDARD.encode(salt),
            iv_b64: STANDARD.encode(iv),
            ciphertext_b64: STANDARD.encode(ciphertext),
        }
    }

    pub fn salt(&self) -> Result<[u8; SALT_LEN], ProtoError> {
        let bytes = STANDARD.decode(&self.salt_b64)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| ProtoError::Malformed(format!("salt must be {SALT_LEN} bytes")))
    }

    pub fn iv(&self) -> Result<[u8; NONCE_LEN], ProtoError> {
        let bytes = STANDARD.decode(&self.iv_b64)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| ProtoError::Malformed(format!("iv must be {NONCE_LEN} bytes")))
    }

    pub fn ciphertext(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(STANDARD.decode(&self.ciphertext_b64)?)
    }

    pub fn check_version(&self) -> Result<(), ProtoError> {
        if self.version != BACKUP_VERSION {
            return Err(ProtoError::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(s)?)
    }
}

// ── Inner payload ────────────────────────────────────────────────────────────

/// Decrypted backup contents: one full device identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupPayload {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// base64(SPKI DER) RSA public key
    #[serde(rename = "publicKey")]
    pub public_key: String,
    /// base64(PKCS#8 DER) RSA private key
    #[serde(rename = "privateKey")]
    pub private_key: String,
    /// Export time, epoch milliseconds
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl BackupPayload {
    /// Serialise for encryption.  The buffer zeroizes on drop.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, ProtoError> {
        Ok(Zeroizing::new(serde_json::to_vec(self)?))
    }

    /// Parse and validate a decrypted payload.  All required fields must
    /// be present, correctly typed and non-empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        let payload: Self = serde_json::from_slice(bytes)?;
        if payload.device_id.is_empty() {
            return Err(ProtoError::Malformed("deviceId is empty".into()));
        }
        if payload.public_key.is_empty() || payload.private_key.is_empty() {
            return Err(ProtoError::Malformed("key material is empty".into()));
        }
        Ok(payload)
    }
}
