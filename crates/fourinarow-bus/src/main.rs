//! fourinarow-broker
//!
//! Standalone pub/sub broker for networked four-in-a-row matches.
//! Usage: `fourinarow-broker [bind-addr]` (default 127.0.0.1:1883)

use anyhow::{Context, Result};
use fourinarow_bus::{Broker, serve};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_BIND: &str = "127.0.0.1:1883";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let bind = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    info!("fourinarow broker starting on {}", bind);

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    serve(listener, Broker::new()).await?;
    Ok(())
}
