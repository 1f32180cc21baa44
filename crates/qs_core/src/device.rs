//! Per-device identity: one long-lived keypair and one stable device id.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use qs_crypto::DeviceKeyPair;
use qs_store::{DeviceKeyRecord, KeyStore};

use crate::error::CoreError;

/// Owns the get-or-generate lifecycle of the local device identity.
/// The key store is injected so tests can run against `MemoryKeyStore`.
pub struct DeviceIdentity {
    store: Arc<dyn KeyStore>,
}

impl DeviceIdentity {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Return the device's keypair, generating and persisting one on first
    /// use.  Idempotent: repeated calls return the stored pair
    /// bit-identically and never rotate an existing identity.
    ///
    /// Known race: two concurrent first-use callers can both observe
    /// absence and both generate; the store's per-key atomicity makes this
    /// last-writer-wins.  Accepted as a documented limitation rather than
    /// solved with a distributed lock.
    pub async fn ensure_device_key_pair(&self, device_id: &str) -> Result<DeviceKeyPair, CoreError> {
        if let Some(record) = self.store.get_device_keys(device_id).await? {
            return Ok(record.key_pair()?);
        }

        let pair = DeviceKeyPair::generate()?;
        let record = DeviceKeyRecord::new(device_id, &pair)?;
        self.store.put_device_keys(&record).await?;
        info!(device_id, "generated new device identity");
        Ok(pair)
    }

    /// The stable local device identifier; minted (UUID v4, 128-bit
    /// entropy) and persisted on first call, constant afterwards.  This id
    /// is the partition key for every device-scoped record.
    pub async fn get_or_create_device_id(&self) -> Result<String, CoreError> {
        if let Some(id) = self.store.local_device_id().await? {
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        self.store.set_local_device_id(&id).await?;
        info!(device_id = %id, "minted new device id");
        Ok(id)
    }
}
