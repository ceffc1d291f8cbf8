//! TCP broker server
//!
//! One task per connection. Each connection owns a reader task feeding
//! decoded frames in, and forwards the broker's deliveries out.

use crate::broker::{Broker, SessionId};
use crate::bus::Message;
use crate::protocol::BusFrame;
use crate::tcp::{TcpWriteWrapper, split};
use crate::transport::{AsyncWriter, Incoming, reader_task};
use fourinarow_core::{FourError, Result};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Accept connections forever
pub async fn serve(listener: TcpListener, broker: Broker) -> Result<()> {
    let local = listener
        .local_addr()
        .map_err(|e| FourError::BusError(format!("listener address unavailable: {}", e)))?;
    info!("broker listening on {}", local);

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| FourError::BusError(format!("accept failed: {}", e)))?;
        let broker = broker.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, broker).await {
                warn!("connection {} ended with error: {}", peer, e);
            }
        });
    }
}

/// Run one client connection to completion
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, broker: Broker) -> Result<()> {
    let _ = stream.set_nodelay(true);
    let (read, mut writer) = split(stream);
    let (tx, mut frames) = mpsc::unbounded_channel();
    let reader = tokio::spawn(reader_task(read, tx));

    let options = match frames.recv().await {
        Some(Incoming::Frame(BusFrame::Connect { options })) => options,
        Some(Incoming::Frame(other)) => {
            reader.abort();
            let reason = format!("expected Connect, got {:?}", other);
            let _ = writer
                .write_frame(&BusFrame::Closed {
                    reason: reason.clone(),
                })
                .await;
            return Err(FourError::ProtocolError(reason));
        }
        Some(Incoming::Closed) | None => {
            debug!("{} closed before connecting", peer);
            return Ok(());
        }
    };

    let (id, deliveries) = broker.connect(options);
    debug!("{} is client {}", peer, id.client_id);
    let result = pump(&broker, &id, &mut writer, frames, deliveries).await;
    reader.abort();

    match result {
        Ok(true) => broker.disconnect(&id),
        Ok(false) => broker.connection_lost(&id),
        Err(e) => {
            broker.connection_lost(&id);
            return Err(e);
        }
    }
    Ok(())
}

/// Shuttle frames until the client leaves
///
/// Returns true for a clean disconnect.
async fn pump(
    broker: &Broker,
    id: &SessionId,
    writer: &mut TcpWriteWrapper,
    mut frames: mpsc::UnboundedReceiver<Incoming>,
    mut deliveries: mpsc::UnboundedReceiver<Message>,
) -> Result<bool> {
    writer.write_frame(&BusFrame::Connected).await?;

    loop {
        tokio::select! {
            incoming = frames.recv() => {
                match incoming {
                    Some(Incoming::Frame(BusFrame::Publish { message })) => broker.publish(message),
                    Some(Incoming::Frame(BusFrame::Subscribe { pattern })) => {
                        if !broker.subscribe(id, &pattern) {
                            return Ok(false);
                        }
                    }
                    Some(Incoming::Frame(BusFrame::Disconnect)) => return Ok(true),
                    Some(Incoming::Frame(other)) => {
                        warn!("client {} sent unexpected frame {:?}", id.client_id, other);
                    }
                    Some(Incoming::Closed) | None => return Ok(false),
                }
            }

            delivery = deliveries.recv() => {
                match delivery {
                    Some(message) => writer.write_frame(&BusFrame::Deliver { message }).await?,
                    None => {
                        // Another connection took over this client id
                        let _ = writer
                            .write_frame(&BusFrame::Closed {
                                reason: "client id taken over".into(),
                            })
                            .await;
                        return Ok(true);
                    }
                }
            }
        }
    }
}
