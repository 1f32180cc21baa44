//! Backup export/import: recovery on a new device, destructive replace,
//! opaque failure on wrong passphrase or tampering.

use std::sync::Arc;

use qs_core::{BackupVault, CoreError, DeviceIdentity, KeyStore, MemoryKeyStore};

async fn device_with_identity(store: Arc<MemoryKeyStore>) -> (String, qs_core::DeviceKeyPair) {
    let identity = DeviceIdentity::new(store);
    let id = identity.get_or_create_device_id().await.unwrap();
    let pair = identity.ensure_device_key_pair(&id).await.unwrap();
    (id, pair)
}

#[tokio::test]
async fn backup_roundtrip_restores_identical_identity() {
    let store = Arc::new(MemoryKeyStore::new());
    let (device_id, pair) = device_with_identity(store.clone()).await;

    let vault = BackupVault::new(store.clone());
    let blob = vault
        .export_backup(&device_id, "correct horse")
        .await
        .unwrap();

    // New device/session starts from an empty store.
    let fresh = Arc::new(MemoryKeyStore::new());
    let restored_id = BackupVault::new(fresh.clone())
        .import_backup("correct horse", &blob)
        .await
        .unwrap();
    assert_eq!(restored_id, device_id);

    let identity = DeviceIdentity::new(fresh.clone());
    assert_eq!(
        identity.get_or_create_device_id().await.unwrap(),
        device_id
    );
    let restored = identity.ensure_device_key_pair(&device_id).await.unwrap();
    assert_eq!(restored.public(), pair.public());
    assert_eq!(
        restored.private_to_b64().unwrap().as_str(),
        pair.private_to_b64().unwrap().as_str()
    );
}

#[tokio::test]
async fn wrong_passphrase_fails_opaquely_and_writes_nothing() {
    let store = Arc::new(MemoryKeyStore::new());
    let (device_id, _) = device_with_identity(store.clone()).await;

    let blob = BackupVault::new(store.clone())
        .export_backup(&device_id, "correct horse")
        .await
        .unwrap();

    let fresh = Arc::new(MemoryKeyStore::new());
    let err = BackupVault::new(fresh.clone())
        .import_backup("wrong", &blob)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidBackupFormat));

    // No partial write: the target store is still empty.
    assert_eq!(fresh.device_key_count().await, 0);
    assert!(fresh.local_device_id().await.unwrap().is_none());
}

#[tokio::test]
async fn tampered_or_versioned_envelope_fails_opaquely() {
    let store = Arc::new(MemoryKeyStore::new());
    let (device_id, _) = device_with_identity(store.clone()).await;
    let vault = BackupVault::new(store.clone());
    let blob = vault
        .export_backup(&device_id, "correct horse")
        .await
        .unwrap();

    let mut versioned = blob.clone();
    versioned.version = 99;
    assert!(matches!(
        vault.import_backup("correct horse", &versioned).await,
        Err(CoreError::InvalidBackupFormat)
    ));

    let mut tampered = blob.clone();
    tampered.ciphertext_b64 = {
        // Flip a byte of the raw ciphertext.
        let mut raw = blob.ciphertext().unwrap();
        raw[0] ^= 0x01;
        use base64::{engine::general_purpose::STANDARD, Engine};
        STANDARD.encode(raw)
    };
    assert!(matches!(
        vault.import_backup("correct horse", &tampered).await,
        Err(CoreError::InvalidBackupFormat)
    ));
}

#[tokio::test]
async fn export_without_identity_fails() {
    let store = Arc::new(MemoryKeyStore::new());
    let err = BackupVault::new(store)
        .export_backup("nonexistent", "pass")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NoDeviceKeys));
}

#[tokio::test]
async fn import_replaces_rather_than_merges() {
    let store_a = Arc::new(MemoryKeyStore::new());
    let (id_a, _) = device_with_identity(store_a.clone()).await;
    let blob = BackupVault::new(store_a.clone())
        .export_backup(&id_a, "pass")
        .await
        .unwrap();

    // Device B already has its own identity before importing A's backup.
    let store_b = Arc::new(MemoryKeyStore::new());
    let (id_b, _) = device_with_identity(store_b.clone()).await;
    assert_ne!(id_a, id_b);

    let restored = BackupVault::new(store_b.clone())
        .import_backup("pass", &blob)
        .await
        .unwrap();
    assert_eq!(restored, id_a);

    // B's previous identity is gone, not merged alongside.
    assert_eq!(store_b.device_key_count().await, 1);
    assert!(store_b.get_device_keys(&id_b).await.unwrap().is_none());
    assert_eq!(
        store_b.local_device_id().await.unwrap().as_deref(),
        Some(id_a.as_str())
    );
}
