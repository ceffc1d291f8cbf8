//! Topic namespace and inbound message decoding
//!
//! All topics live under `fourinarow/`:
//! - `fourinarow/lobby/<name>`: presence, `"1"` present, empty absent, retained
//! - `fourinarow/join/<name>`: pairing request, payload is the requester's name
//! - `fourinarow/game/<name>/opponent`: who `<name>` is playing, retained
//! - `fourinarow/game/<name>/cursor`: one byte cursor column, retained
//! - `fourinarow/game/<name>/drop`: one byte column of a placed piece

use crate::name::PlayerName;
use fourinarow_bus::{ConnectOptions, Message};
use fourinarow_core::COLUMNS;

const ROOT: &[u8] = b"fourinarow";
const LOBBY: &[u8] = b"lobby";
const JOIN: &[u8] = b"join";
const GAME: &[u8] = b"game";
const OPPONENT: &[u8] = b"opponent";
const CURSOR: &[u8] = b"cursor";
const DROP: &[u8] = b"drop";

/// Subscription covering every presence topic
pub const LOBBY_PATTERN: &[u8] = b"fourinarow/lobby/+";

/// Payload announcing presence
pub const PRESENT: &[u8] = b"1";

pub fn presence_topic(name: &PlayerName) -> Vec<u8> {
    fourinarow_bus::topic::join(&[ROOT, LOBBY, name.as_bytes()])
}

pub fn join_topic(name: &PlayerName) -> Vec<u8> {
    fourinarow_bus::topic::join(&[ROOT, JOIN, name.as_bytes()])
}

pub fn opponent_topic(name: &PlayerName) -> Vec<u8> {
    fourinarow_bus::topic::join(&[ROOT, GAME, name.as_bytes(), OPPONENT])
}

pub fn cursor_topic(name: &PlayerName) -> Vec<u8> {
    fourinarow_bus::topic::join(&[ROOT, GAME, name.as_bytes(), CURSOR])
}

pub fn drop_topic(name: &PlayerName) -> Vec<u8> {
    fourinarow_bus::topic::join(&[ROOT, GAME, name.as_bytes(), DROP])
}

/// Connect options for `name`, with a will that retracts its presence
pub fn connect_options(name: &PlayerName) -> ConnectOptions {
    ConnectOptions::new(name.to_string()).with_will(presence_topic(name), Vec::new(), true)
}

/// Whether a peer is in the lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

/// An inbound message decoded once at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Presence { peer: PlayerName, presence: Presence },
    /// `from` wants to play against the local player
    Join { from: PlayerName },
    /// `peer` announced who it is playing against
    Opponent { peer: PlayerName, opponent: PlayerName },
    Cursor { peer: PlayerName, column: u8 },
    Drop { peer: PlayerName, column: u8 },
    /// Anything unexpected or malformed
    Ignored,
}

/// Decode a delivered message as seen by `local`
///
/// Join requests addressed to someone else, names that are not valid topic
/// levels and out-of-range columns all decode to [`Inbound::Ignored`].
pub fn decode(message: &Message, local: &PlayerName) -> Inbound {
    let levels: Vec<&[u8]> = message.topic.split(|&b| b == b'/').collect();
    match levels.as_slice() {
        [ROOT, LOBBY, peer] => match PlayerName::parse(peer) {
            Ok(peer) => {
                let presence = if message.payload.is_empty() {
                    Presence::Absent
                } else {
                    Presence::Present
                };
                Inbound::Presence { peer, presence }
            }
            Err(_) => Inbound::Ignored,
        },
        [ROOT, JOIN, target] if *target == local.as_bytes() => {
            match PlayerName::parse(&message.payload) {
                Ok(from) if from != *local => Inbound::Join { from },
                _ => Inbound::Ignored,
            }
        }
        [ROOT, GAME, peer, OPPONENT] => {
            match (PlayerName::parse(peer), PlayerName::parse(&message.payload)) {
                (Ok(peer), Ok(opponent)) => Inbound::Opponent { peer, opponent },
                _ => Inbound::Ignored,
            }
        }
        [ROOT, GAME, peer, kind] if *kind == CURSOR || *kind == DROP => {
            let (Ok(peer), Some(column)) = (PlayerName::parse(peer), single_column(&message.payload))
            else {
                return Inbound::Ignored;
            };
            if *kind == CURSOR {
                Inbound::Cursor { peer, column }
            } else {
                Inbound::Drop { peer, column }
            }
        }
        _ => Inbound::Ignored,
    }
}

fn single_column(payload: &[u8]) -> Option<u8> {
    match payload {
        [column] if *column < COLUMNS => Some(*column),
        _ => None,
    }
}
