//! Passphrase-protected export and restore of the device identity.
//!
//! Export is non-destructive and hands the caller a self-contained
//! envelope for external storage; this core never keeps a copy.  Import
//! REPLACES the local identity — it never merges with a pre-existing one.
//!
//! Every import failure (unknown version, wrong passphrase, corruption,
//! malformed payload) is surfaced as the single opaque
//! `CoreError::InvalidBackupFormat`, and always before any store write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use qs_crypto::{aead, kdf, DeviceKeyPair, DevicePublicKey};
use qs_proto::{BackupEnvelope, BackupPayload};
use qs_store::{DeviceKeyRecord, KeyStore};

use crate::error::CoreError;

pub struct BackupVault {
    store: Arc<dyn KeyStore>,
}

impl BackupVault {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Export the device's keypair as a passphrase-encrypted envelope.
    /// Slow path: the KDF is deliberately CPU-bound.
    pub async fn export_backup(
        &self,
        device_id: &str,
        passphrase: &str,
    ) -> Result<BackupEnvelope, CoreError> {
        let record = self
            .store
            .get_device_keys(device_id)
            .await?
            .ok_or(CoreError::NoDeviceKeys)?;

        let payload = BackupPayload {
            device_id: record.device_id.clone(),
            public_key: record.public_key.clone(),
            private_key: record.private_key.clone(),
            created_at: Utc::now().timestamp_millis(),
        };
        let plaintext = payload.to_bytes()?;

        let salt = kdf::generate_salt();
        let key = kdf::backup_key_from_passphrase(passphrase.as_bytes(), &salt)?;
        let (iv, ciphertext) = aead::encrypt(key.as_bytes(), &plaintext)?;

        info!(device_id, "exported device identity backup");
        Ok(BackupEnvelope::new(&salt, &iv, &ciphertext))
    }

    /// Restore a device identity from an envelope, replacing whatever
    /// identity this device had.  Returns the restored device id.
    ///
    /// All validation — version, KDF + authenticated decryption, payload
    /// schema, key-material parse — completes before the first store
    /// write, so a failed import leaves the local store untouched.
    pub async fn import_backup(
        &self,
        passphrase: &str,
        envelope: &BackupEnvelope,
    ) -> Result<String, CoreError> {
        envelope
            .check_version()
            .map_err(|_| CoreError::InvalidBackupFormat)?;
        let salt = envelope.salt().map_err(|_| CoreError::InvalidBackupFormat)?;
        let iv = envelope.iv().map_err(|_| CoreError::InvalidBackupFormat)?;
        let ciphertext = envelope
            .ciphertext()
            .map_err(|_| CoreError::InvalidBackupFormat)?;

        let key = kdf::backup_key_from_passphrase(passphrase.as_bytes(), &salt)?;
        let plaintext = aead::decrypt(key.as_bytes(), &iv, &ciphertext)
            .map_err(|_| CoreError::InvalidBackupFormat)?;
        let payload =
            BackupPayload::from_bytes(&plaintext).map_err(|_| CoreError::InvalidBackupFormat)?;

        // Key material must parse and the halves must match before the
        // store is touched.
        let pair = DeviceKeyPair::from_private_b64(&payload.private_key)
            .map_err(|_| CoreError::InvalidBackupFormat)?;
        let public = DevicePublicKey::from_b64(&payload.public_key)
            .map_err(|_| CoreError::InvalidBackupFormat)?;
        if &public != pair.public() {
            return Err(CoreError::InvalidBackupFormat);
        }

        warn!(device_id = %payload.device_id, "replacing local device identity from backup");
        self.store.wipe_device_keys().await?;
        self.store
            .put_device_keys(&DeviceKeyRecord {
                device_id: payload.device_id.clone(),
                public_key: payload.public_key.clone(),
                private_key: payload.private_key.clone(),
                updated_at: Utc::now(),
            })
            .await?;
        self.store.set_local_device_id(&payload.device_id).await?;

        Ok(payload.device_id)
    }
}
