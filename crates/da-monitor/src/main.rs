//! da-monitor: header-driven Celestia DA monitor.
//!
//! ## Usage
//!
//! ```bash
//! # Local light node, auth disabled
//! da-monitor
//!
//! # Remote node with auth, read-only rollkit monitoring
//! DA_MONITOR_TOKEN=... da-monitor --url wss://da.example.com --variant rollkit
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use da_monitor::cli::Args;
use da_monitor::logging::init_logging;
use da_monitor::{Monitor, RpcNode};
use da_rpc::{ClientConfig, NodeClient};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level).context("Failed to initialize logging")?;

    let config = args.into_config().context("Invalid configuration")?;

    let client = NodeClient::connect(
        ClientConfig::new(config.url.clone())
            .with_token(config.token.clone())
            .with_request_timeout(config.request_timeout)
            .with_subscription_capacity(config.queue_capacity),
    )
    .context("Failed to create node client")?;
    info!(url = %config.url, "Connecting to node");
    let node = Arc::new(RpcNode::new(client));

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown signal received");
                    cancel.cancel();
                }
                Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
            }
        }
    });

    Monitor::new(node, config)
        .run(cancel)
        .await
        .context("Monitor stopped with an error")?;

    info!("Monitor stopped");
    Ok(())
}
