//! qs_store — durable key persistence for Questline Secure Messaging
//!
//! Two logical partitions, independent by key:
//! - `device_keys` keyed by device id — exactly one identity per device
//! - `room_keys`   keyed by conversation id — at most one raw key each
//!
//! plus the singleton local device id.
//!
//! # Atomicity
//! Every put is a single SQLite upsert; a crash mid-write leaves the
//! previous row intact or the new one fully written, never a mixture.
//! Concurrent calls on the same key have no ordering guarantee beyond
//! that per-call atomicity.
//!
//! # Dependency injection
//! Callers program against the `KeyStore` trait.  `SqliteKeyStore` is the
//! durable implementation; `MemoryKeyStore` is the fake for tests, with
//! no process-wide state to touch.

pub mod db;
pub mod error;
pub mod keystore;
pub mod models;

pub use db::SqliteKeyStore;
pub use error::StoreError;
pub use keystore::{KeyStore, MemoryKeyStore};
pub use models::{DeviceKeyRecord, RoomKeyRecord};
