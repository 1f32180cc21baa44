//! Room-key transport: asymmetric wrap/unwrap of conversation keys.
//!
//! A `RoomKey` is the 32-byte symmetric key used for all message traffic
//! in one conversation.  The creator wraps it once per recipient device
//! under that device's RSA public key (OAEP/SHA-256); the recipient
//! unwraps with its private key and persists the recovered raw key.
//!
//! Failure shape: `unwrap_for_self` returns the single opaque
//! `CryptoError::Unwrap` for every failure mode (wrong key, truncation,
//! tampering, wrong plaintext length) so callers cannot be used as a
//! decryption oracle.

use rand::rngs::OsRng;
use rand::RngCore;
use rsa::Oaep;
use sha2::Sha256;
use zeroize::{Zeroizing, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::identity::{DeviceKeyPair, DevicePublicKey};

/// Room keys are always exactly 32 bytes (AES-256).
pub const ROOM_KEY_LEN: usize = 32;

/// Raw symmetric conversation key.  Zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct RoomKey([u8; ROOM_KEY_LEN]);

impl core::fmt::Debug for RoomKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RoomKey(..)")
    }
}

impl RoomKey {
    /// 32 bytes from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut key = [0u8; ROOM_KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != ROOM_KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "Room key must be {ROOM_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut key = [0u8; ROOM_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; ROOM_KEY_LEN] {
        &self.0
    }
}

/// Encrypt a room key toward a recipient device.  A 32-byte key always
/// fits under 2048-bit OAEP (190-byte payload limit), so `Wrap` here
/// means a malformed public key or a rejected primitive call.
pub fn wrap_for_device(
    recipient: &DevicePublicKey,
    key: &RoomKey,
) -> Result<Vec<u8>, CryptoError> {
    recipient
        .as_rsa()
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), key.as_bytes())
        .map_err(|_| CryptoError::Wrap)
}

/// Decrypt a wrapped room key with the local device's private key.
pub fn unwrap_for_self(own: &DeviceKeyPair, wrapped: &[u8]) -> Result<RoomKey, CryptoError> {
    let plaintext = Zeroizing::new(
        own.private()
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| CryptoError::Unwrap)?,
    );
    RoomKey::from_bytes(&plaintext).map_err(|_| CryptoError::Unwrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unwrap_roundtrip() {
        let device = DeviceKeyPair::generate().unwrap();
        let key = RoomKey::generate();

        let wrapped = wrap_for_device(device.public(), &key).unwrap();
        let unwrapped = unwrap_for_self(&device, &wrapped).unwrap();
        assert_eq!(key.as_bytes(), unwrapped.as_bytes());
    }

    #[test]
    fn unwrap_with_wrong_device_fails_opaquely() {
        let alice = DeviceKeyPair::generate().unwrap();
        let mallory = DeviceKeyPair::generate().unwrap();
        let key = RoomKey::generate();

        let wrapped = wrap_for_device(alice.public(), &key).unwrap();
        let err = unwrap_for_self(&mallory, &wrapped).unwrap_err();
        assert!(matches!(err, CryptoError::Unwrap));
    }

    #[test]
    fn unwrap_rejects_corrupted_bytes() {
        let device = DeviceKeyPair::generate().unwrap();
        let key = RoomKey::generate();

        let mut wrapped = wrap_for_device(device.public(), &key).unwrap();
        wrapped[10] ^= 0xFF;
        let err = unwrap_for_self(&device, &wrapped).unwrap_err();
        assert!(matches!(err, CryptoError::Unwrap));

        let err = unwrap_for_self(&device, b"short").unwrap_err();
        assert!(matches!(err, CryptoError::Unwrap));
    }

    #[test]
    fn room_key_length_is_enforced() {
        assert!(RoomKey::from_bytes(&[0u8; 16]).is_err());
        assert!(RoomKey::from_bytes(&[0u8; 32]).is_ok());
    }
}
