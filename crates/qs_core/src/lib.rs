//! qs_core — the key-management core of Questline Secure Messaging
//!
//! Everything around this crate is ordinary web-app plumbing; this is the
//! one subsystem doing real cryptographic protocol work.  It produces and
//! consumes persisted key material and opaque byte blobs; it never talks
//! to the network itself.
//!
//! # Components
//! - `device`  — per-device identity: one long-lived RSA keypair + stable id
//! - `room`    — symmetric room keys: generate, wrap toward a recipient
//!   device, unwrap locally, persist
//! - `message` — authenticated message encryption under a room key
//! - `backup`  — passphrase-protected export/restore of the device identity
//!
//! # Error policy
//! No cryptographic failure is swallowed: every one surfaces as a typed
//! `CoreError` with no retry, no fallback plaintext, no partial success.
//! Unwrap and backup-import failures are deliberately opaque.

pub mod backup;
pub mod device;
pub mod error;
pub mod message;
pub mod room;

pub use backup::BackupVault;
pub use device::DeviceIdentity;
pub use error::CoreError;
pub use message::{open_message, seal_message};
pub use room::RoomKeyManager;

pub use qs_crypto::{CryptoError, DeviceKeyPair, DevicePublicKey, RoomKey};
pub use qs_proto::{BackupEnvelope, EncryptedMessage, WrappedRoomKey};
pub use qs_store::{KeyStore, MemoryKeyStore, SqliteKeyStore};
