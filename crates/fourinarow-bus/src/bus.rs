//! Message bus abstraction
//!
//! A bus connects one client to a broker. Everything the lobby and the
//! networked match need goes through the [`MessageBus`] trait so they work
//! the same over the in-process bus and over TCP.

use async_trait::async_trait;
use fourinarow_core::Result;
use serde::{Deserialize, Serialize};

/// A message as published or delivered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub topic: Vec<u8>,
    pub payload: Vec<u8>,
    /// Whether the broker keeps the payload for late subscribers
    #[serde(default)]
    pub retained: bool,
}

impl Message {
    pub fn new(topic: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>, retained: bool) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retained,
        }
    }
}

/// Message the broker publishes on a client's behalf if the client goes
/// away without disconnecting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct LastWill {
    pub topic: Vec<u8>,
    pub payload: Vec<u8>,
    pub retained: bool,
}

impl LastWill {
    /// Turn the will into the message the broker publishes
    pub fn into_message(self) -> Message {
        Message::new(self.topic, self.payload, self.retained)
    }
}

/// Options given when connecting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectOptions {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will: Option<LastWill>,
}

impl ConnectOptions {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            will: None,
        }
    }

    /// Register a last will
    pub fn with_will(mut self, topic: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>, retained: bool) -> Self {
        self.will = Some(LastWill {
            topic: topic.into(),
            payload: payload.into(),
            retained,
        });
        self
    }
}

/// A connected pub/sub client
#[async_trait]
pub trait MessageBus: Send {
    /// Publish `payload` on `topic`
    async fn publish(&mut self, topic: &[u8], payload: &[u8], retained: bool) -> Result<()>;

    /// Subscribe to a topic pattern; `+` matches exactly one level
    async fn subscribe(&mut self, pattern: &[u8]) -> Result<()>;

    /// Take every message that has arrived since the last poll, oldest first
    ///
    /// Never waits for new messages. Fails once the connection is gone.
    async fn poll(&mut self) -> Result<Vec<Message>>;

    /// Disconnect cleanly. The last will is discarded.
    async fn disconnect(&mut self) -> Result<()>;
}
