//! Broker state shared by every bus implementation
//!
//! The broker keeps one entry per connected client (its subscriptions, its
//! last will and the channel its deliveries go to) plus the retained
//! message store. Both [`MemoryBus`](crate::memory::MemoryBus) and the TCP
//! server drive the same [`Broker`].

use crate::bus::{ConnectOptions, LastWill, Message};
use crate::topic;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Identifies one connection of a client
///
/// A client id can be taken over by a newer connection; the session number
/// keeps a stale connection from tearing down the newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    pub client_id: String,
    pub session: u64,
}

struct ClientEntry {
    session: u64,
    subscriptions: Vec<Vec<u8>>,
    will: Option<LastWill>,
    tx: mpsc::UnboundedSender<Message>,
}

impl ClientEntry {
    fn wants(&self, topic_name: &[u8]) -> bool {
        self.subscriptions
            .iter()
            .any(|pattern| topic::matches(pattern, topic_name))
    }
}

#[derive(Default)]
struct BrokerState {
    clients: HashMap<String, ClientEntry>,
    retained: BTreeMap<Vec<u8>, Vec<u8>>,
    next_session: u64,
}

impl BrokerState {
    fn publish(&mut self, message: Message) {
        if message.retained {
            if message.payload.is_empty() {
                self.retained.remove(&message.topic);
            } else {
                self.retained
                    .insert(message.topic.clone(), message.payload.clone());
            }
        }

        let live = Message {
            retained: false,
            ..message
        };
        for entry in self.clients.values() {
            if entry.wants(&live.topic) {
                // A closed receiver means the client is on its way out
                let _ = entry.tx.send(live.clone());
            }
        }
    }

    fn current(&mut self, id: &SessionId) -> Option<&mut ClientEntry> {
        self.clients
            .get_mut(&id.client_id)
            .filter(|entry| entry.session == id.session)
    }
}

/// Handle to the shared broker state
#[derive(Clone, Default)]
pub struct Broker {
    state: Arc<Mutex<BrokerState>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a client and return the receiver its deliveries arrive on
    ///
    /// A client already connected under the same id is replaced without
    /// publishing its will; its receiver is closed.
    pub fn connect(&self, options: ConnectOptions) -> (SessionId, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.next_session += 1;
        let session = state.next_session;
        let entry = ClientEntry {
            session,
            subscriptions: Vec::new(),
            will: options.will,
            tx,
        };
        if state.clients.insert(options.client_id.clone(), entry).is_some() {
            info!("client {} taken over by a new connection", options.client_id);
        } else {
            info!("client {} connected", options.client_id);
        }
        let id = SessionId {
            client_id: options.client_id,
            session,
        };
        (id, rx)
    }

    /// Publish a message to every matching subscriber
    pub fn publish(&self, message: Message) {
        debug!(
            "publish {} ({} bytes, retained={})",
            String::from_utf8_lossy(&message.topic),
            message.payload.len(),
            message.retained
        );
        self.lock().publish(message);
    }

    /// Add a subscription and deliver matching retained messages
    ///
    /// Returns false if the session is no longer current.
    pub fn subscribe(&self, id: &SessionId, pattern: &[u8]) -> bool {
        let mut state = self.lock();
        let replay: Vec<Message> = state
            .retained
            .iter()
            .filter(|(topic_name, _)| topic::matches(pattern, topic_name))
            .map(|(topic_name, payload)| Message::new(topic_name.clone(), payload.clone(), true))
            .collect();
        let Some(entry) = state.current(id) else {
            return false;
        };
        if !entry.subscriptions.iter().any(|p| p == pattern) {
            entry.subscriptions.push(pattern.to_vec());
        }
        for message in replay {
            let _ = entry.tx.send(message);
        }
        debug!(
            "client {} subscribed to {}",
            id.client_id,
            String::from_utf8_lossy(pattern)
        );
        true
    }

    /// Remove a client that disconnected cleanly; its will is discarded
    pub fn disconnect(&self, id: &SessionId) {
        let mut state = self.lock();
        if state.current(id).is_some() {
            state.clients.remove(&id.client_id);
            info!("client {} disconnected", id.client_id);
        }
    }

    /// Remove a client that went away without disconnecting and publish
    /// its will
    pub fn connection_lost(&self, id: &SessionId) {
        let mut state = self.lock();
        if state.current(id).is_none() {
            return;
        }
        let will = state
            .clients
            .remove(&id.client_id)
            .and_then(|entry| entry.will);
        match will {
            Some(will) => {
                info!(
                    "client {} lost, publishing will on {}",
                    id.client_id,
                    String::from_utf8_lossy(&will.topic)
                );
                state.publish(will.into_message());
            }
            None => info!("client {} lost", id.client_id),
        }
    }

    /// Payload retained for `topic_name`, if any
    pub fn retained(&self, topic_name: &[u8]) -> Option<Vec<u8>> {
        self.lock().retained.get(topic_name).cloned()
    }

    pub fn client_count(&self) -> usize {
        self.lock().clients.len()
    }
}
