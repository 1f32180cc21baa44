//! SQLite implementation of `KeyStore` via sqlx.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use tracing::debug;

use crate::error::StoreError;
use crate::keystore::KeyStore;
use crate::models::{DeviceKeyRecord, RoomKeyRecord};

/// Durable key store handle.  Cheap to clone (Arc internally).
#[derive(Clone)]
pub struct SqliteKeyStore {
    pool: SqlitePool,
}

impl SqliteKeyStore {
    /// Open (or create) the SQLite database at `db_path`.
    /// Runs all pending migrations automatically.
    ///
    /// WAL journal mode is configured at connection time here — NOT inside
    /// a migration, because SQLite forbids changing `journal_mode` inside
    /// a transaction and sqlx wraps every migration in one.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyStore for SqliteKeyStore {
    async fn get_device_keys(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceKeyRecord>, StoreError> {
        debug!(device_id, "device key lookup");
        let record = sqlx::query_as::<_, DeviceKeyRecord>(
            "SELECT device_id, public_key, private_key, updated_at
             FROM device_keys WHERE device_id = ?",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn put_device_keys(&self, record: &DeviceKeyRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO device_keys (device_id, public_key, private_key, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(device_id) DO UPDATE SET
                 public_key = excluded.public_key,
                 private_key = excluded.private_key,
                 updated_at = excluded.updated_at",
        )
        .bind(&record.device_id)
        .bind(&record.public_key)
        .bind(&record.private_key)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn wipe_device_keys(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM device_keys").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM local_device").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_room_key(
        &self,
        conversation_id: &str,
    ) -> Result<Option<RoomKeyRecord>, StoreError> {
        debug!(conversation_id, "room key lookup");
        let record = sqlx::query_as::<_, RoomKeyRecord>(
            "SELECT conversation_id, raw_key, updated_at
             FROM room_keys WHERE conversation_id = ?",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn put_room_key(&self, record: &RoomKeyRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO room_keys (conversation_id, raw_key, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(conversation_id) DO UPDATE SET
                 raw_key = excluded.raw_key,
                 updated_at = excluded.updated_at",
        )
        .bind(&record.conversation_id)
        .bind(&record.raw_key)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn local_device_id(&self) -> Result<Option<String>, StoreError> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT device_id FROM local_device WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(id)
    }

    async fn set_local_device_id(&self, device_id: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO local_device (id, device_id) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET device_id = excluded.device_id",
        )
        .bind(device_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
