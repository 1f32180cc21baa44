use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("Malformed field: {0}")]
    Malformed(String),

    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(u32),
}
