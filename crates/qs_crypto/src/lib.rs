//! qs_crypto — Questline Secure Messaging cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited RustCrypto crates.
//! - Zeroize all secret material on drop.
//! - Public APIs return opaque newtypes to prevent accidental misuse.
//! - No I/O and no persistence here; key storage lives in `qs_store`.
//!
//! # Module layout
//! - `identity` — per-device long-term RSA keypair (wrapping identity)
//! - `wrap`     — room-key transport: RSA-OAEP wrap/unwrap of 32-byte keys
//! - `aead`     — AES-256-GCM message encryption with detached 12-byte nonce
//! - `kdf`      — PBKDF2-HMAC-SHA256 passphrase derivation for backups
//! - `error`    — unified error type

pub mod aead;
pub mod error;
pub mod identity;
pub mod kdf;
pub mod wrap;

pub use error::CryptoError;
pub use identity::{DeviceKeyPair, DevicePublicKey};
pub use wrap::RoomKey;
