//! The node runtime orchestrating the gateway and background tasks.

use crate::container::{NodeConfig, SubsystemContainer};
use anyhow::{Context, Result};
use qc_08_consensus::ConsensusApi;
use qc_16_api_gateway::GatewayService;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Shortest interval between stalled-round checks.
const MIN_ROUND_CHECK: Duration = Duration::from_millis(250);

/// The main node runtime.
pub struct NodeRuntime {
    /// Subsystem container with all initialized services.
    container: Arc<SubsystemContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a new node runtime with configuration.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("invalid node configuration")?;
        let container = Arc::new(SubsystemContainer::new(config)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get a reference to the subsystem container.
    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }

    /// Bind the configured socket and run until `shutdown` resolves or
    /// [`NodeRuntime::shutdown`] is called.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let listener = GatewayService::bind(self.container.config.network.bind_addr()).await?;
        self.run_on(listener, shutdown).await
    }

    /// Run on an already bound listener.
    pub async fn run_on<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let local: SocketAddr = listener.local_addr()?;
        let gateway = GatewayService::new(self.container.app_state(), &self.container.config.gateway)?;
        let server = tokio::spawn(gateway.serve(listener, self.shutdown_signal()));

        info!("===========================================");
        info!("  Quorum-Chain node");
        info!("  Listening: {}", local);
        info!("  Address:   {}", self.container.identity.address());
        info!("===========================================");

        self.spawn_round_timer();
        self.join_bootstrap().await;

        tokio::select! {
            _ = shutdown => {}
            _ = self.shutdown_signal() => {}
        }
        self.shutdown();

        server
            .await
            .context("gateway task panicked")?
            .context("gateway stopped with an error")?;
        info!("Shutdown complete");
        Ok(())
    }

    /// Signal every task to stop.
    pub fn shutdown(&self) {
        if *self.shutdown_rx.borrow() {
            return;
        }
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }

    fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown_rx.clone();
        async move {
            while !*rx.borrow() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    /// Periodically abandon rounds older than the configured timeout.
    fn spawn_round_timer(&self) {
        let Some(timeout) = self.container.config.consensus.round_timeout else {
            return;
        };
        let period = (timeout / 4).max(MIN_ROUND_CHECK);
        let consensus = Arc::clone(&self.container.consensus);
        let mut shutdown = self.shutdown_rx.clone();

        info!(timeout_secs = timeout.as_secs(), "[qc-08] Round timer started");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        consensus.expire_stalled_round(Instant::now());
                    }
                    _ = shutdown.changed() => {
                        info!("[qc-08] Shutdown signal received");
                        break;
                    }
                }
            }
        });
    }

    /// Ask the bootstrap peer to join this node into its network.
    ///
    /// Failure leaves the node running on its own; it can still be joined
    /// later through `/connect` on any member.
    async fn join_bootstrap(&self) {
        let Some(bootstrap) = &self.container.config.network.bootstrap_peer else {
            return;
        };
        let local = self.container.identity.address();
        match self.container.peer_client.request_join(bootstrap, local).await {
            Ok(ack) => info!(bootstrap = %bootstrap, note = %ack.note, "[qc-01] Joined network"),
            Err(e) => warn!(bootstrap = %bootstrap, error = %e, "[qc-01] Bootstrap join failed"),
        }
    }
}
