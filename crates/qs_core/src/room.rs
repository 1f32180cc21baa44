//! Room-key lifecycle: generate, wrap, unwrap, persist, load.
//!
//! Per (device, conversation) state machine:
//!
//!   NoKey ──creator: generate + persist──────────────▶ KeyPresent
//!   NoKey ──recipient: unwrap + persist──────────────▶ KeyPresent
//!
//! KeyPresent is terminal — no rotation exists at this layer.  Any unwrap
//! failure leaves the state at NoKey.

use std::sync::Arc;

use tracing::debug;

use qs_crypto::{wrap, DeviceKeyPair, DevicePublicKey, RoomKey};
use qs_proto::WrappedRoomKey;
use qs_store::{KeyStore, RoomKeyRecord};

use crate::error::CoreError;

pub struct RoomKeyManager {
    store: Arc<dyn KeyStore>,
}

impl RoomKeyManager {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// 32 cryptographically random bytes.  Nothing is persisted until
    /// `persist_room_key` (or the `create_room_key` convenience) runs.
    pub fn generate_room_key(&self) -> RoomKey {
        RoomKey::generate()
    }

    /// Wrap a room key toward a recipient device, yielding the transport
    /// value the relay forwards unmodified.
    pub fn wrap_for_device(
        &self,
        conversation_id: &str,
        recipient_device_id: &str,
        recipient: &DevicePublicKey,
        key: &RoomKey,
    ) -> Result<WrappedRoomKey, CoreError> {
        let wrapped = wrap::wrap_for_device(recipient, key)?;
        Ok(WrappedRoomKey::new(
            conversation_id,
            recipient_device_id,
            &wrapped,
        ))
    }

    /// Unwrap a received room key with the local device's private key.
    /// Pure; does not touch the store.
    pub fn unwrap_for_self(
        &self,
        wrapped: &[u8],
        own: &DeviceKeyPair,
    ) -> Result<RoomKey, CoreError> {
        Ok(wrap::unwrap_for_self(own, wrapped)?)
    }

    /// Store a raw key for a conversation, overwriting any prior value.
    pub async fn persist_room_key(
        &self,
        conversation_id: &str,
        key: &RoomKey,
    ) -> Result<(), CoreError> {
        self.store
            .put_room_key(&RoomKeyRecord::new(conversation_id, key))
            .await?;
        debug!(conversation_id, "room key persisted");
        Ok(())
    }

    /// `None` means this device has neither generated nor received a key
    /// for the conversation yet.
    pub async fn load_room_key(&self, conversation_id: &str) -> Result<Option<RoomKey>, CoreError> {
        match self.store.get_room_key(conversation_id).await? {
            Some(record) => Ok(Some(record.room_key()?)),
            None => Ok(None),
        }
    }

    /// Creator path: generate and persist in one step.
    pub async fn create_room_key(&self, conversation_id: &str) -> Result<RoomKey, CoreError> {
        let key = self.generate_room_key();
        self.persist_room_key(conversation_id, &key).await?;
        Ok(key)
    }

    /// Recipient path: decode, unwrap and persist a received wrapped key.
    /// Every failure happens before the store write, so a bad wrapped blob
    /// leaves this conversation at NoKey.
    pub async fn accept_wrapped_key(
        &self,
        wire: &WrappedRoomKey,
        own: &DeviceKeyPair,
    ) -> Result<RoomKey, CoreError> {
        let wrapped = wire.wrapped_bytes()?;
        let key = self.unwrap_for_self(&wrapped, own)?;
        self.persist_room_key(&wire.conversation_id, &key).await?;
        Ok(key)
    }
}
