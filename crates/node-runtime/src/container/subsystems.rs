//! # Subsystem Container
//!
//! Builds every service of one node and shares them through `Arc`s.
//!
//! ```text
//!            NodeIdentity ─────────────┐
//!                                      ▼
//!   SharedPeerRegistry ──→ PeerRegistryService ──┐
//!           │                                    ├──→ AppState (gateway)
//!           └────────────→ ConsensusService ─────┘
//!                               │
//!               HttpPeerClient (broadcaster, notifier, key directory)
//! ```

use super::config::NodeConfig;
use anyhow::{Context, Result};
use qc_01_peer_registry::{shared_registry, PeerRegistryService};
use qc_08_consensus::{ConsensusDependencies, ConsensusService};
use qc_16_api_gateway::{AppState, HttpPeerClient};
use shared_crypto::NodeIdentity;
use std::sync::Arc;
use tracing::info;

/// Consensus service as wired in a running node.
pub type NodeConsensus = ConsensusService<HttpPeerClient, HttpPeerClient>;

/// Peer registry service as wired in a running node.
pub type NodeRegistry = PeerRegistryService<HttpPeerClient>;

/// Container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub identity: Arc<NodeIdentity>,
    pub peer_client: Arc<HttpPeerClient>,
    pub peer_registry: Arc<NodeRegistry>,
    pub consensus: Arc<NodeConsensus>,
}

impl SubsystemContainer {
    /// Generate a fresh identity and wire the subsystems.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let address = config
            .network
            .public_address()
            .context("resolving public address")?;
        let identity = Arc::new(NodeIdentity::generate(address.clone()));
        let peer_client = Arc::new(
            HttpPeerClient::new(&config.gateway).context("building peer client")?,
        );
        let peers = shared_registry(address.clone());

        let consensus = Arc::new(ConsensusService::new(ConsensusDependencies {
            broadcaster: Arc::clone(&peer_client),
            key_directory: Arc::clone(&peer_client),
            identity: Arc::clone(&identity),
            peers: Arc::clone(&peers),
            config: config.consensus.clone(),
        }));
        let peer_registry = Arc::new(PeerRegistryService::new(peers, Arc::clone(&peer_client)));

        info!(
            address = %address,
            public_key = identity.export_public_key(),
            "[runtime] Node identity generated"
        );

        Ok(Self {
            config,
            identity,
            peer_client,
            peer_registry,
            consensus,
        })
    }

    /// Handler state for the gateway router.
    pub fn app_state(&self) -> AppState {
        AppState {
            consensus: Arc::clone(&self.consensus) as _,
            registry: Arc::clone(&self.peer_registry) as _,
            identity: Arc::clone(&self.identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_01_peer_registry::PeerRegistryApi;
    use qc_08_consensus::ConsensusApi;

    #[test]
    fn test_container_shares_one_registry() {
        let container = SubsystemContainer::new(NodeConfig::default()).unwrap();

        let local = container.peer_registry.local_address();
        let peer = shared_types::NodeAddress::parse("http://localhost:3002").unwrap();
        assert!(container.peer_registry.register_peer(peer, &local));

        let status = container.consensus.status();
        assert_eq!(status.address.as_str(), "http://localhost:3001");
        assert_eq!(status.peers.len(), 1);
        assert_eq!(status.public_key, container.identity.export_public_key());
    }
}
