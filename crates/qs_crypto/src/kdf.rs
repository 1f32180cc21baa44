//! Passphrase key derivation for backup blobs.
//!
//! PBKDF2-HMAC-SHA256 with 210 000 iterations, deliberately slow so a
//! leaked backup blob resists brute force.  Callers must treat
//! export/import as the slow path (tens to hundreds of milliseconds of
//! CPU per call).

use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;

/// Salt length stored in every backup envelope.
pub const SALT_LEN: usize = 16;

/// PBKDF2 work factor.  Raising this invalidates no existing blob — the
/// iteration count is fixed per envelope version.
pub const PBKDF2_ITERATIONS: u32 = 210_000;

/// 32-byte backup encryption key derived from a passphrase.  Zeroized on
/// drop.
#[derive(ZeroizeOnDrop)]
pub struct BackupKey([u8; 32]);

impl BackupKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Derive the backup key from a passphrase + 16-byte salt.
/// The salt is not secret; it rides in the envelope next to the ciphertext.
pub fn backup_key_from_passphrase(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
) -> Result<BackupKey, CryptoError> {
    let mut output = [0u8; 32];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase, salt, PBKDF2_ITERATIONS, &mut output)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(BackupKey(output))
}

/// Fresh random salt for a new backup export.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
