//! Presence directory
//!
//! Tracks which peers are currently announced in the lobby. The directory
//! is the single owner of the peer list; the lobby menu reads it every
//! frame, so every change is visible on the next render.

use crate::name::PlayerName;
use crate::topics::{self, Presence};
use fourinarow_bus::MessageBus;
use fourinarow_core::Result;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PresenceDirectory {
    local: PlayerName,
    peers: Vec<PlayerName>,
}

impl PresenceDirectory {
    pub fn new(local: PlayerName) -> Self {
        Self {
            local,
            peers: Vec::new(),
        }
    }

    pub fn local(&self) -> &PlayerName {
        &self.local
    }

    /// Visible peers, never including the local player
    pub fn peers(&self) -> &[PlayerName] {
        &self.peers
    }

    pub fn contains(&self, peer: &PlayerName) -> bool {
        self.peers.contains(peer)
    }

    /// Apply one presence event. Returns whether the peer list changed.
    ///
    /// Our own announcement echoes back from the broker and is skipped.
    /// Removing a peer that is not listed is a no-op.
    pub fn apply(&mut self, peer: PlayerName, presence: Presence) -> bool {
        if peer == self.local {
            return false;
        }
        match presence {
            Presence::Present if !self.contains(&peer) => {
                info!("{} entered the lobby", peer);
                self.peers.push(peer);
                true
            }
            Presence::Present => false,
            Presence::Absent => match self.peers.iter().position(|p| *p == peer) {
                Some(index) => {
                    info!("{} left the lobby", peer);
                    self.peers.remove(index);
                    true
                }
                None => {
                    debug!("absence for unknown peer {}", peer);
                    false
                }
            },
        }
    }

    /// Subscribe to presence and announce ourselves (retained)
    pub async fn announce<B: MessageBus + ?Sized>(&self, bus: &mut B) -> Result<()> {
        bus.subscribe(topics::LOBBY_PATTERN).await?;
        bus.publish(&topics::presence_topic(&self.local), topics::PRESENT, true)
            .await?;
        info!("announced {} in the lobby", self.local);
        Ok(())
    }

    /// Withdraw our retained announcement
    pub async fn retract<B: MessageBus + ?Sized>(&self, bus: &mut B) -> Result<()> {
        bus.publish(&topics::presence_topic(&self.local), b"", true)
            .await?;
        info!("retracted {} from the lobby", self.local);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_present_then_absent_leaves_empty() {
        let mut directory = PresenceDirectory::new(name("me"));
        assert!(directory.apply(name("alice"), Presence::Present));
        assert!(directory.apply(name("alice"), Presence::Absent));
        assert!(directory.peers().is_empty());
    }

    #[test]
    fn test_absent_for_unknown_peer_is_noop() {
        let mut directory = PresenceDirectory::new(name("me"));
        directory.apply(name("bob"), Presence::Present);
        assert!(!directory.apply(name("ghost"), Presence::Absent));
        assert_eq!(directory.peers(), &[name("bob")]);
    }

    #[test]
    fn test_local_player_excluded() {
        let mut directory = PresenceDirectory::new(name("me"));
        assert!(!directory.apply(name("me"), Presence::Present));
        assert!(directory.peers().is_empty());
    }

    #[test]
    fn test_repeated_presence_listed_once() {
        let mut directory = PresenceDirectory::new(name("me"));
        directory.apply(name("alice"), Presence::Present);
        directory.apply(name("bob"), Presence::Present);
        assert!(!directory.apply(name("alice"), Presence::Present));
        assert_eq!(directory.peers(), &[name("alice"), name("bob")]);
    }
}
