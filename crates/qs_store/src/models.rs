//! Database row models — these map to/from SQL rows.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qs_crypto::{DeviceKeyPair, RoomKey};

use crate::error::StoreError;

/// One device identity.  Exactly one row per device id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceKeyRecord {
    pub device_id: String,
    /// base64(SPKI DER) RSA public key — safe to publish
    pub public_key: String,
    /// base64(PKCS#8 DER) RSA private key — leaves this store only inside
    /// an encrypted backup blob
    pub private_key: String,
    pub updated_at: DateTime<Utc>,
}

impl DeviceKeyRecord {
    pub fn new(device_id: &str, pair: &DeviceKeyPair) -> Result<Self, StoreError> {
        Ok(Self {
            device_id: device_id.to_string(),
            public_key: pair.public().to_b64()?,
            private_key: pair.private_to_b64()?.to_string(),
            updated_at: Utc::now(),
        })
    }

    /// Rebuild the keypair from the stored private half.
    pub fn key_pair(&self) -> Result<DeviceKeyPair, StoreError> {
        Ok(DeviceKeyPair::from_private_b64(&self.private_key)?)
    }
}

/// One raw conversation key.  At most one row per conversation id on this
/// device; created locally by the conversation creator or by a successful
/// unwrap of a received wrapped key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomKeyRecord {
    pub conversation_id: String,
    /// base64-encoded 32-byte symmetric key
    pub raw_key: String,
    pub updated_at: DateTime<Utc>,
}

impl RoomKeyRecord {
    pub fn new(conversation_id: &str, key: &RoomKey) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            raw_key: STANDARD.encode(key.as_bytes()),
            updated_at: Utc::now(),
        }
    }

    pub fn room_key(&self) -> Result<RoomKey, StoreError> {
        let bytes = STANDARD
            .decode(&self.raw_key)
            .map_err(qs_crypto::CryptoError::Base64Decode)?;
        Ok(RoomKey::from_bytes(&bytes)?)
    }
}
