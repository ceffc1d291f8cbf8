//! TCP transport and the TCP bus client

use crate::bus::{ConnectOptions, Message, MessageBus};
use crate::protocol::BusFrame;
use crate::transport::{AsyncReader, AsyncWriter, Incoming, MAX_FRAME_LEN, reader_task};
use async_trait::async_trait;
use fourinarow_core::{FourError, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// TCP read wrapper
pub struct TcpReadWrapper(pub OwnedReadHalf);

#[async_trait]
impl AsyncReader for TcpReadWrapper {
    async fn read_message(&mut self) -> Result<Vec<u8>> {
        // Read 4-byte length prefix (little-endian)
        let mut len_bytes = [0u8; 4];
        self.0
            .read_exact(&mut len_bytes)
            .await
            .map_err(|e| FourError::BusError(format!("TCP read length failed: {}", e)))?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        if len > MAX_FRAME_LEN {
            return Err(FourError::ProtocolError(format!(
                "Frame too large: {} bytes",
                len
            )));
        }

        let mut data = vec![0u8; len];
        self.0
            .read_exact(&mut data)
            .await
            .map_err(|e| FourError::BusError(format!("TCP read data failed: {}", e)))?;

        Ok(data)
    }
}

/// TCP write wrapper
pub struct TcpWriteWrapper(pub OwnedWriteHalf);

#[async_trait]
impl AsyncWriter for TcpWriteWrapper {
    async fn write_message(&mut self, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len())
            .map_err(|_| FourError::ProtocolError(format!("Frame too large: {} bytes", data.len())))?;
        self.0
            .write_all(&len.to_le_bytes())
            .await
            .map_err(|e| FourError::BusError(format!("TCP write length failed: {}", e)))?;

        self.0
            .write_all(data)
            .await
            .map_err(|e| FourError::BusError(format!("TCP write data failed: {}", e)))?;

        self.0
            .flush()
            .await
            .map_err(|e| FourError::BusError(format!("TCP flush failed: {}", e)))?;

        Ok(())
    }
}

/// Split a stream into framed halves
pub fn split(stream: TcpStream) -> (TcpReadWrapper, TcpWriteWrapper) {
    let (read, write) = stream.into_split();
    (TcpReadWrapper(read), TcpWriteWrapper(write))
}

/// A client connected to a `fourinarow-broker` over TCP
///
/// Dropping the bus without calling `disconnect` closes the socket and the
/// broker publishes the client's last will.
pub struct TcpBus {
    writer: TcpWriteWrapper,
    incoming: mpsc::UnboundedReceiver<Incoming>,
    reader: JoinHandle<()>,
    connected: bool,
}

impl TcpBus {
    /// Connect and wait for the broker to accept the session
    pub async fn connect(addr: impl ToSocketAddrs, options: ConnectOptions) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| FourError::BusError(format!("TCP connect failed: {}", e)))?;
        stream
            .set_nodelay(true)
            .map_err(|e| FourError::BusError(format!("TCP set_nodelay failed: {}", e)))?;
        let (read, mut writer) = split(stream);

        let client_id = options.client_id.clone();
        writer.write_frame(&BusFrame::Connect { options }).await?;

        let (tx, mut incoming) = mpsc::unbounded_channel();
        let reader = tokio::spawn(reader_task(read, tx));

        match incoming.recv().await {
            Some(Incoming::Frame(BusFrame::Connected)) => {
                info!("connected to broker as {}", client_id);
                Ok(Self {
                    writer,
                    incoming,
                    reader,
                    connected: true,
                })
            }
            Some(Incoming::Frame(BusFrame::Closed { reason })) => {
                reader.abort();
                Err(FourError::BusError(format!("Broker refused connection: {}", reason)))
            }
            Some(Incoming::Frame(other)) => {
                reader.abort();
                Err(FourError::ProtocolError(format!(
                    "Expected Connected, got {:?}",
                    other
                )))
            }
            Some(Incoming::Closed) | None => {
                reader.abort();
                Err(FourError::ConnectionLost)
            }
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(FourError::ConnectionLost)
        }
    }

    async fn send(&mut self, frame: BusFrame) -> Result<()> {
        self.ensure_connected()?;
        if let Err(e) = self.writer.write_frame(&frame).await {
            self.connected = false;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl MessageBus for TcpBus {
    async fn publish(&mut self, topic: &[u8], payload: &[u8], retained: bool) -> Result<()> {
        self.send(BusFrame::Publish {
            message: Message::new(topic, payload, retained),
        })
        .await
    }

    async fn subscribe(&mut self, pattern: &[u8]) -> Result<()> {
        self.send(BusFrame::Subscribe {
            pattern: pattern.to_vec(),
        })
        .await
    }

    async fn poll(&mut self) -> Result<Vec<Message>> {
        self.ensure_connected()?;
        let mut messages = Vec::new();
        loop {
            match self.incoming.try_recv() {
                Ok(Incoming::Frame(BusFrame::Deliver { message })) => messages.push(message),
                Ok(Incoming::Frame(BusFrame::Closed { reason })) => {
                    warn!("broker closed the session: {}", reason);
                }
                Ok(Incoming::Frame(other)) => {
                    debug!("ignoring unexpected frame {:?}", other);
                }
                Err(TryRecvError::Empty) => return Ok(messages),
                Ok(Incoming::Closed) | Err(TryRecvError::Disconnected) => {
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
        if !self.connected {
            return Ok(());
        }
        let result = self.writer.write_frame(&BusFrame::Disconnect).await;
        self.connected = false;
        self.reader.abort();
        let _ = self.writer.0.shutdown().await;
        info!("disconnected from broker");
        result
    }
}

impl Drop for TcpBus {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
