//! The `KeyStore` trait and the in-memory test fake.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{DeviceKeyRecord, RoomKeyRecord};

/// Asynchronous key-value persistence with two independent partitions.
///
/// Implementations must make each `put` atomic per key.  `get` returning
/// `None` means the partition has no record for that key — callers decide
/// whether that is an error.
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn get_device_keys(&self, device_id: &str)
        -> Result<Option<DeviceKeyRecord>, StoreError>;

    /// Overwrites any existing record for the same device id.
    async fn put_device_keys(&self, record: &DeviceKeyRecord) -> Result<(), StoreError>;

    /// Clears the device-key partition and the local device id.  Used by
    /// backup restore, which replaces the local identity rather than
    /// merging with it.
    async fn wipe_device_keys(&self) -> Result<(), StoreError>;

    async fn get_room_key(&self, conversation_id: &str)
        -> Result<Option<RoomKeyRecord>, StoreError>;

    /// Overwrites any existing record for the same conversation id.
    async fn put_room_key(&self, record: &RoomKeyRecord) -> Result<(), StoreError>;

    /// The persisted local device identifier, if one was ever minted.
    async fn local_device_id(&self) -> Result<Option<String>, StoreError>;

    async fn set_local_device_id(&self, device_id: &str) -> Result<(), StoreError>;
}

// ── In-memory fake ───────────────────────────────────────────────────────────

/// Test fake: same contract, no durability.  Production code uses
/// `SqliteKeyStore`; this exists so tests never touch process-wide state.
#[derive(Clone, Default)]
pub struct MemoryKeyStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    device_keys: HashMap<String, DeviceKeyRecord>,
    room_keys: HashMap<String, RoomKeyRecord>,
    local_device_id: Option<String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored device identities (test assertions only).
    pub async fn device_key_count(&self) -> usize {
        self.inner.read().await.device_keys.len()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get_device_keys(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceKeyRecord>, StoreError> {
        Ok(self.inner.read().await.device_keys.get(device_id).cloned())
    }

    async fn put_device_keys(&self, record: &DeviceKeyRecord) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .device_keys
            .insert(record.device_id.clone(), record.clone());
        Ok(())
    }

    async fn wipe_device_keys(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.device_keys.clear();
        inner.local_device_id = None;
        Ok(())
    }

    async fn get_room_key(
        &self,
        conversation_id: &str,
    ) -> Result<Option<RoomKeyRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .room_keys
            .get(conversation_id)
            .cloned())
    }

    async fn put_room_key(&self, record: &RoomKeyRecord) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .room_keys
            .insert(record.conversation_id.clone(), record.clone());
        Ok(())
    }

    async fn local_device_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().await.local_device_id.clone())
    }

    async fn set_local_device_id(&self, device_id: &str) -> Result<(), StoreError> {
        self.inner.write().await.local_device_id = Some(device_id.to_string());
        Ok(())
    }
}
