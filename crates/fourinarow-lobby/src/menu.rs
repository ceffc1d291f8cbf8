//! Lobby menu: visible peers plus a "leave" entry

use crate::name::PlayerName;
use fourinarow_core::KeySet;

/// Label of the entry that quits the lobby without playing
pub const LEAVE_LABEL: &str = "leave";

pub const MENU_TITLE: &str = "fourinarow";

/// A confirmed menu choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Peer(PlayerName),
    Leave,
}

/// Selection state of the lobby menu
///
/// The entries themselves are not stored: they are the directory's peers
/// at the moment of each step, followed by "leave".
#[derive(Debug, Clone)]
pub struct LobbyMenu {
    selected: usize,
    previous: KeySet,
}

impl Default for LobbyMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl LobbyMenu {
    pub fn new() -> Self {
        Self {
            selected: 0,
            previous: KeySet::ALL,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Handle one frame of keys against the current peers
    ///
    /// Up/down move one entry per press; O or X confirms.
    pub fn step(&mut self, keys: KeySet, peers: &[PlayerName]) -> Option<Choice> {
        let last = peers.len();
        self.selected = self.selected.min(last);

        let pressed = keys.pressed_since(self.previous);
        self.previous = keys;
        if pressed.intersects(KeySet::UP) && self.selected > 0 {
            self.selected -= 1;
        }
        if pressed.intersects(KeySet::DOWN) && self.selected < last {
            self.selected += 1;
        }
        if !pressed.intersects(KeySet::SELECT) {
            return None;
        }
        Some(match peers.get(self.selected) {
            Some(peer) => Choice::Peer(peer.clone()),
            None => Choice::Leave,
        })
    }

    /// Entry labels for the screen
    pub fn labels(peers: &[PlayerName]) -> Vec<String> {
        peers
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(LEAVE_LABEL.to_string()))
            .collect()
    }
}
