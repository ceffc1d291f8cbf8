//! # fourinarow-lobby
//!
//! Networked four-in-a-row over a pub/sub bus.
//!
//! This crate provides:
//! - Player names and the topic namespace
//! - The presence directory and lobby menu
//! - The pairing negotiator and the resulting session
//! - The remote sync adapter and the networked match loop

pub mod directory;
pub mod menu;
pub mod name;
pub mod negotiator;
pub mod networked;
pub mod session;
pub mod sync;
pub mod topics;

pub use directory::PresenceDirectory;
pub use menu::{Choice, LobbyMenu};
pub use name::PlayerName;
pub use negotiator::{Negotiator, Resolution, run_lobby};
pub use networked::{play_networked, run_match};
pub use session::Session;
pub use sync::{RemoteEvent, RemoteSync};
pub use topics::{Inbound, Presence, connect_options};
