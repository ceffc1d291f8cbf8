//! Pub/sub message bus for networked four-in-a-row
//!
//! This crate provides:
//! - The `MessageBus` client trait with connect options and last wills
//! - A broker with retained messages and single-level `+` wildcards
//! - An in-process bus over a shared broker
//! - A TCP bus client and the TCP broker server
//! - Length-prefixed JSON framing for the TCP wire

pub mod broker;
pub mod bus;
pub mod memory;
pub mod protocol;
pub mod server;
pub mod tcp;
pub mod topic;
pub mod transport;

pub use broker::{Broker, SessionId};
pub use bus::{ConnectOptions, LastWill, Message, MessageBus};
pub use memory::MemoryBus;
pub use protocol::{BusFrame, deserialize, serialize};
pub use server::{handle_connection, serve};
pub use tcp::TcpBus;
pub use transport::{AsyncReader, AsyncWriter, Incoming, reader_task};
