use thiserror::Error;

use qs_crypto::CryptoError;
use qs_proto::ProtoError;
use qs_store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No device keypair exists for the requested device id.
    #[error("No device keys found for this device")]
    NoDeviceKeys,

    /// Opaque by design: unsupported version, wrong passphrase, corruption
    /// and tampering all surface as this one kind.
    #[error("Invalid backup format")]
    InvalidBackupFormat,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Protocol error: {0}")]
    Proto(#[from] ProtoError),
}
