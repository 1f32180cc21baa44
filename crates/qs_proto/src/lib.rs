//! qs_proto — wire and storage envelopes for Questline Secure Messaging
//!
//! The messaging transport is a DUMB RELAY: every value defined here is
//! opaque to it.  It sees base64 text and forwards it unmodified; all
//! semantics live on the two end devices.
//!
//! # Module layout
//! - `message` — encrypted message envelope + wrapped room-key transport value
//! - `backup`  — passphrase-encrypted backup envelope and its inner payload
//! - `error`   — decode/validation errors

pub mod backup;
pub mod error;
pub mod message;

pub use backup::{BackupEnvelope, BackupPayload, BACKUP_VERSION};
pub use error::ProtoError;
pub use message::{EncryptedMessage, WrappedRoomKey};
