//! Transport abstractions for broker connections
//!
//! Provides AsyncReader/AsyncWriter traits for length-prefixed frames and
//! the background reader task both ends of a connection use.

use crate::protocol::{BusFrame, deserialize, serialize};
use async_trait::async_trait;
use fourinarow_core::Result;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Largest frame either side accepts
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Trait for async reading from a transport
#[async_trait]
pub trait AsyncReader: Send {
    /// Read a complete message from the transport
    /// Messages are length-prefixed: 4-byte little-endian length + JSON payload
    async fn read_message(&mut self) -> Result<Vec<u8>>;
}

/// Trait for async writing to a transport
#[async_trait]
pub trait AsyncWriter: Send + Sync {
    /// Write a complete message to the transport
    /// Messages are length-prefixed: 4-byte little-endian length + JSON payload
    async fn write_message(&mut self, data: &[u8]) -> Result<()>;

    /// Serialize and write one frame
    async fn write_frame(&mut self, frame: &BusFrame) -> Result<()> {
        let data = serialize(frame)?;
        self.write_message(&data).await
    }
}

/// What the reader task hands to the connection owner
#[derive(Debug)]
pub enum Incoming {
    Frame(BusFrame),
    /// The transport failed or reached end of stream; nothing follows
    Closed,
}

/// Background reader task
///
/// Reads frames until the transport fails, forwarding each decoded frame.
/// Frames that do not decode are logged and skipped. `Closed` is always the
/// last thing sent. The task also stops once the receiving side is gone.
pub async fn reader_task<R: AsyncReader>(mut reader: R, tx: mpsc::UnboundedSender<Incoming>) {
    loop {
        match reader.read_message().await {
            Ok(data) => {
                let json_preview: String = String::from_utf8_lossy(&data).chars().take(200).collect();
                debug!("[wire] len={} json={}", data.len(), json_preview);

                match deserialize(&data) {
                    Ok(frame) => {
                        if tx.send(Incoming::Frame(frame)).is_err() {
                            debug!("Frame receiver dropped, reader task exiting");
                            return;
                        }
                    }
                    Err(e) => error!("Failed to deserialize frame: {}", e),
                }
            }
            Err(e) => {
                debug!("Reader task stopped: {}", e);
                let _ = tx.send(Incoming::Closed);
                return;
            }
        }
    }
}
