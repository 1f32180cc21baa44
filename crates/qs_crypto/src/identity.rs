//! Device identity key management
//!
//! Each *device* has exactly one long-lived 2048-bit RSA keypair.  The
//! public half is published so other devices can wrap room keys toward
//! this device (OAEP/SHA-256, see `wrap`); the private half never leaves
//! the local key store except inside a passphrase-encrypted backup blob.
//!
//! Serialisation
//! -------------
//! - Public key:  base64(SPKI DER)  — safe to transmit.
//! - Private key: base64(PKCS#8 DER) — local store / backup payload only.
//!
//! Identity policy (NON-NEGOTIABLE)
//! --------------------------------
//! An existing device keypair is never rotated silently.  The
//! get-or-generate path in `qs_core::device` must return the stored pair
//! bit-identically on every call after the first.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Modulus size for device keypairs.  2048 bits leaves 190 bytes of OAEP
/// payload headroom, comfortably above the 32-byte room keys we wrap.
pub const RSA_BITS: usize = 2048;

// ── Public key ────────────────────────────────────────────────────────────────

/// A device's RSA public key, base64(SPKI DER) on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct DevicePublicKey(RsaPublicKey);

impl DevicePublicKey {
    pub fn to_b64(&self) -> Result<String, CryptoError> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(STANDARD.encode(der.as_bytes()))
    }

    pub fn from_b64(s: &str) -> Result<Self, CryptoError> {
        let der = STANDARD.decode(s)?;
        let key = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self(key))
    }

    /// Human-readable fingerprint for manual device verification:
    /// SHA-256 of the SPKI DER, truncated to 20 bytes (160 bits),
    /// hex-encoded in groups of 4.
    ///
    /// Example: "a1b2 c3d4 e5f6 7890 abcd ef01 2345 6789 0abc def0"
    pub fn fingerprint(&self) -> Result<String, CryptoError> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let hash = Sha256::digest(der.as_bytes());
        let hex = hex::encode(&hash[..20]);
        Ok(hex
            .chars()
            .collect::<Vec<_>>()
            .chunks(4)
            .map(|c| c.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" "))
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

// ── Keypair ───────────────────────────────────────────────────────────────────

/// Long-term device keypair.  The `rsa` crate zeroizes the private key on
/// drop.
pub struct DeviceKeyPair {
    public: DevicePublicKey,
    private: RsaPrivateKey,
}

impl DeviceKeyPair {
    /// Generate a fresh 2048-bit keypair.  CPU-bound; callers should treat
    /// this as a one-time slow path per device.
    pub fn generate() -> Result<Self, CryptoError> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_BITS)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = DevicePublicKey(RsaPublicKey::from(&private));
        Ok(Self { public, private })
    }

    pub fn public(&self) -> &DevicePublicKey {
        &self.public
    }

    /// base64(PKCS#8 DER) of the private key — for the local store and the
    /// encrypted backup payload only.
    pub fn private_to_b64(&self) -> Result<Zeroizing<String>, CryptoError> {
        let der = self
            .private
            .to_pkcs8_der()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Zeroizing::new(STANDARD.encode(der.as_bytes())))
    }

    /// Rebuild a keypair from its stored private half.  The public half is
    /// derived, so a stored record can never hold a mismatched pair.
    pub fn from_private_b64(s: &str) -> Result<Self, CryptoError> {
        let der = Zeroizing::new(STANDARD.decode(s)?);
        let private = RsaPrivateKey::from_pkcs8_der(&der)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let public = DevicePublicKey(RsaPublicKey::from(&private));
        Ok(Self { public, private })
    }

    pub(crate) fn private(&self) -> &RsaPrivateKey {
        &self.private
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_b64_roundtrip_preserves_public_half() {
        let pair = DeviceKeyPair::generate().unwrap();
        let restored = DeviceKeyPair::from_private_b64(&pair.private_to_b64().unwrap()).unwrap();
        assert_eq!(pair.public(), restored.public());
    }

    #[test]
    fn public_b64_roundtrip() {
        let pair = DeviceKeyPair::generate().unwrap();
        let b64 = pair.public().to_b64().unwrap();
        let parsed = DevicePublicKey::from_b64(&b64).unwrap();
        assert_eq!(pair.public(), &parsed);
    }

    #[test]
    fn rejects_garbage_public_key() {
        assert!(DevicePublicKey::from_b64("not base64 at all!!").is_err());
        let valid_b64_garbage = base64::engine::general_purpose::STANDARD.encode(b"nonsense");
        assert!(DevicePublicKey::from_b64(&valid_b64_garbage).is_err());
    }

    #[test]
    fn fingerprint_is_stable_and_grouped() {
        let pair = DeviceKeyPair::generate().unwrap();
        let fp1 = pair.public().fingerprint().unwrap();
        let fp2 = pair.public().fingerprint().unwrap();
        assert_eq!(fp1, fp2);
        // 20 bytes -> 40 hex chars -> 10 groups of 4
        assert_eq!(fp1.split(' ').count(), 10);
    }
}
