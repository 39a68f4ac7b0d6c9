//! # Quorum-Chain Node Runtime
//!
//! Entry point for one Quorum-Chain node.
//!
//! ```text
//! node-runtime --port 3001
//! node-runtime --port 3002 --bootstrap http://localhost:3001
//! ```
//!
//! Flags override the `QC_*` environment, which overrides the defaults.

use anyhow::{Context, Result};
use clap::Parser;
use node_runtime::{NodeConfig, NodeRuntime};
use qc_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::NodeAddress;
use std::net::IpAddr;
use tracing::info;

/// Quorum-Chain node
///
/// Serves the node API and takes part in three-phase block agreement.
#[derive(Parser, Debug)]
#[command(name = "node-runtime")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Listening port (overrides QC_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface to bind (overrides QC_HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Address peers use to reach this node (overrides QC_PUBLIC_ADDRESS)
    #[arg(long)]
    public_address: Option<String>,

    /// Existing node to join through at startup (overrides QC_BOOTSTRAP_PEER)
    #[arg(long)]
    bootstrap: Option<String>,

    /// Log filter (overrides QC_LOG_LEVEL and RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut NodeConfig) -> Result<()> {
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(host) = self.host {
            config.network.host = host;
        }
        if let Some(address) = &self.public_address {
            config.network.public_address =
                Some(NodeAddress::parse(address).context("invalid --public-address")?);
        }
        if let Some(peer) = &self.bootstrap {
            config.network.bootstrap_peer =
                Some(NodeAddress::parse(peer).context("invalid --bootstrap")?);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    let _telemetry = init_telemetry(telemetry).context("failed to initialise telemetry")?;

    let mut config = NodeConfig::from_env().context("failed to load configuration")?;
    cli.apply(&mut config)?;

    let runtime = NodeRuntime::new(config)?;
    info!("Node is running. Press Ctrl+C to stop.");
    runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}
