//! Per-message and room-key transport envelopes.
//!
//! Wire formats (JSON, field names fixed):
//!   EncryptedMessage: { "ivB64": "...", "ciphertextB64": "..." }
//!   WrappedRoomKey:   { "conversationId": "...", "recipientDeviceId": "...",
//!                       "wrappedKeyB64": "..." }

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::ProtoError;

/// GCM nonce length mirrored here so decoding can validate without a
/// qs_crypto dependency.
const NONCE_LEN: usize = 12;

// ── Encrypted message ────────────────────────────────────────────────────────

/// One encrypted message as handed to the transport.  The ciphertext
/// includes the 16-byte authentication tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedMessage {
    #[serde(rename = "ivB64")]
    pub iv_b64: String,
    #[serde(rename = "ciphertextB64")]
    pub ciphertext_b64: String,
}

impl EncryptedMessage {
    pub fn new(iv: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Self {
        Self {
            iv_b64: STANDARD.encode(iv),
            ciphertext_b64: STANDARD.encode(ciphertext),
        }
    }

    pub fn iv(&self) -> Result<[u8; NONCE_LEN], ProtoError> {
        let bytes = STANDARD.decode(&self.iv_b64)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| ProtoError::Malformed(format!("iv must be {NONCE_LEN} bytes")))
    }

    pub fn ciphertext(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(STANDARD.decode(&self.ciphertext_b64)?)
    }

    pub fn to_json(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(s)?)
    }
}

// ── Wrapped room key ─────────────────────────────────────────────────────────

/// Transient transport value: one room key wrapped for one recipient
/// device.  Produced by the sender, consumed once by the recipient's
/// unwrap; this core never persists the wrapped form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedRoomKey {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "recipientDeviceId")]
    pub recipient_device_id: String,
    #[serde(rename = "wrappedKeyB64")]
    pub wrapped_key_b64: String,
}

impl WrappedRoomKey {
    pub fn new(conversation_id: &str, recipient_device_id: &str, wrapped: &[u8]) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            recipient_device_id: recipient_device_id.to_string(),
            wrapped_key_b64: STANDARD.encode(wrapped),
        }
    }

    pub fn wrapped_bytes(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(STANDARD.decode(&self.wrapped_key_b64)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypted_message_wire_field_names() {
        let msg = EncryptedMessage::new(&[7u8; 12], b"opaque bytes");
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"ivB64\""));
        assert!(json.contains("\"ciphertextB64\""));

        let back = EncryptedMessage::from_json(&json).unwrap();
        assert_eq!(back.iv().unwrap(), [7u8; 12]);
        assert_eq!(back.ciphertext().unwrap(), b"opaque bytes");
    }

    #[test]
    fn rejects_wrong_iv_length() {
        let msg = EncryptedMessage {
            iv_b64: STANDARD.encode([0u8; 8]),
            ciphertext_b64: STANDARD.encode(b"ct"),
        };
        assert!(matches!(msg.iv(), Err(ProtoError::Malformed(_))));
    }

    #[test]
    fn wrapped_room_key_roundtrip() {
        let wire = WrappedRoomKey::new("c1", "device-b", &[1, 2, 3, 4]);
        assert_eq!(wire.wrapped_bytes().unwrap(), vec![1, 2, 3, 4]);

        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("\"conversationId\":\"c1\""));
        assert!(json.contains("\"recipientDeviceId\":\"device-b\""));
        assert!(json.contains("\"wrappedKeyB64\""));
    }
}
