//! The pairing result

use crate::name::PlayerName;
use fourinarow_core::Player;

/// Who we are playing against and which side we are on
///
/// Only the pairing negotiator creates sessions, at most one per lobby run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    local: PlayerName,
    opponent: PlayerName,
    side: Player,
}

impl Session {
    pub(crate) fn new(local: PlayerName, opponent: PlayerName, side: Player) -> Self {
        Self {
            local,
            opponent,
            side,
        }
    }

    pub fn local(&self) -> &PlayerName {
        &self.local
    }

    pub fn opponent(&self) -> &PlayerName {
        &self.opponent
    }

    /// The player this device controls; green (player one) moves first
    pub fn side(&self) -> Player {
        self.side
    }

    pub fn color(&self) -> u8 {
        self.side.color()
    }
}
