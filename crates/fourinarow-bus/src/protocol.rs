//! Wire protocol between bus clients and the broker server
//!
//! Frames are serialized as JSON with internally-tagged enums.
//! Format: {"Type": "FrameType", ...fields}

use crate::bus::{ConnectOptions, Message};
use serde::{Deserialize, Serialize};

/// Frames exchanged over a broker connection
///
/// Note: `rename_all` on enums only affects variant names, not field names inside variants.
/// Each field must be explicitly renamed using `#[serde(rename = "...")]` for PascalCase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "Type", rename_all = "PascalCase")]
pub enum BusFrame {
    // === Client -> Broker ===
    /// First frame on every connection
    Connect {
        #[serde(flatten)]
        options: ConnectOptions,
    },

    Publish {
        #[serde(flatten)]
        message: Message,
    },

    Subscribe {
        #[serde(rename = "Pattern")]
        pattern: Vec<u8>,
    },

    /// Clean goodbye; the broker discards the last will
    Disconnect,

    // === Broker -> Client ===
    /// Connection accepted
    Connected,

    /// A message matching one of the client's subscriptions
    Deliver {
        #[serde(flatten)]
        message: Message,
    },

    /// The broker closed the session
    Closed {
        #[serde(rename = "Reason")]
        reason: String,
    },
}

/// Serialize a frame to JSON bytes
pub fn serialize(frame: &BusFrame) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(frame)
}

/// Deserialize a frame from JSON bytes
pub fn deserialize(bytes: &[u8]) -> Result<BusFrame, serde_json::Error> {
    serde_json::from_slice(bytes)
}
