//! NFC payload for store-card passes.

use serde::{Deserialize, Serialize};

/// Payload transmitted over NFC during a contactless transaction.
///
/// Only store-card passes carry an NFC payload, and an empty one is created
/// automatically when a pass enters the store-card style. An empty payload is
/// omitted from the serialized descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nfc {
    /// Message transmitted to the terminal.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Public key the terminal uses to encrypt its response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_public_key: Option<String>,
}

impl Nfc {
    /// Create a payload with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            encryption_public_key: None,
        }
    }

    /// Set the terminal encryption public key.
    pub fn encryption_public_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_public_key = Some(key.into());
        self
    }

    /// Whether the payload carries no data and should be omitted on output.
    pub fn is_empty(&self) -> bool {
        self.message.is_empty() && self.encryption_public_key.is_none()
    }
}
