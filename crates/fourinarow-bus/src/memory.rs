//! In-process bus over a shared [`Broker`]

use crate::broker::{Broker, SessionId};
use crate::bus::{ConnectOptions, Message, MessageBus};
use async_trait::async_trait;
use fourinarow_core::{FourError, Result};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::debug;

/// A client connected to an in-process broker
///
/// Dropping the bus without calling `disconnect` counts as a lost
/// connection: the broker publishes the client's last will.
pub struct MemoryBus {
    broker: Broker,
    id: SessionId,
    rx: mpsc::UnboundedReceiver<Message>,
    connected: bool,
}

impl MemoryBus {
    pub fn connect(broker: &Broker, options: ConnectOptions) -> Self {
        let (id, rx) = broker.connect(options);
        Self {
            broker: broker.clone(),
            id,
            rx,
            connected: true,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.id.client_id
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(FourError::ConnectionLost)
        }
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    async fn publish(&mut self, topic: &[u8], payload: &[u8], retained: bool) -> Result<()> {
        self.ensure_connected()?;
        self.broker.publish(Message::new(topic, payload, retained));
        Ok(())
    }

    async fn subscribe(&mut self, pattern: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        if self.broker.subscribe(&self.id, pattern) {
            Ok(())
        } else {
            self.connected = false;
            Err(FourError::ConnectionLost)
        }
    }

    async fn poll(&mut self) -> Result<Vec<Message>> {
        self.ensure_connected()?;
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) => return Ok(messages),
                Err(TryRecvError::Disconnected) => {
                    self.connected = false;
                    if messages.is_empty() {
                        return Err(FourError::ConnectionLost);
                    }
                    return Ok(messages);
                }
            }
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.connected {
            self.broker.disconnect(&self.id);
            self.connected = false;
            debug!("memory bus {} disconnected", self.id.client_id);
        }
        Ok(())
    }
}

impl Drop for MemoryBus {
    fn drop(&mut self) {
        if self.connected {
            self.broker.connection_lost(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_and_poll() {
        let broker = Broker::new();
        let mut alice = MemoryBus::connect(&broker, ConnectOptions::new("alice"));
        let mut bob = MemoryBus::connect(&broker, ConnectOptions::new("bob"));
        bob.subscribe(b"fourinarow/join/bob").await.unwrap();

        alice.publish(b"fourinarow/join/bob", b"alice", false).await.unwrap();
        let got = bob.poll().await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].payload, b"alice");
        assert!(bob.poll().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drop_publishes_will() {
        let broker = Broker::new();
        let mut watcher = MemoryBus::connect(&broker, ConnectOptions::new("watcher"));
        watcher.subscribe(b"fourinarow/lobby/+").await.unwrap();
        {
            let mut alice = MemoryBus::connect(
                &broker,
                ConnectOptions::new("alice").with_will(&b"fourinarow/lobby/alice"[..], Vec::new(), true),
            );
            alice.publish(b"fourinarow/lobby/alice", b"1", true).await.unwrap();
        }
        let got = watcher.poll().await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].payload, b"1");
        assert!(got[1].payload.is_empty());
        assert_eq!(broker.retained(b"fourinarow/lobby/alice"), None);
    }

    #[tokio::test]
    async fn test_takeover_reports_connection_lost() {
        let broker = Broker::new();
        let mut first = MemoryBus::connect(&broker, ConnectOptions::new("alice"));
        let _second = MemoryBus::connect(&broker, ConnectOptions::new("alice"));
        assert!(matches!(first.poll().await, Err(FourError::ConnectionLost)));
        assert!(first.publish(b"t", b"p", false).await.is_err());
    }
}
