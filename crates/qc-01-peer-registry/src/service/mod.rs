//! Peer Registry Service - wires the registry to the outbound notifier.

use crate::domain::{PeerRegistryResult, SharedPeerRegistry};
use crate::ports::{JoinOutcome, PeerNotifier, PeerRegistryApi};
use async_trait::async_trait;
use shared_types::{NodeAddress, PeerMessage, RegisterAllPeersRequest, RegisterPeerRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};


/// Peer Registry Service implementing the driving port.
pub struct PeerRegistryService<N: PeerNotifier> {
    registry: SharedPeerRegistry,
    notifier: Arc<N>,
}

impl<N: PeerNotifier> PeerRegistryService<N> {
    pub fn new(registry: SharedPeerRegistry, notifier: Arc<N>) -> Self {
        Self { registry, notifier }
    }

    /// The shared registry (also read by the consensus engine).
    pub fn registry(&self) -> SharedPeerRegistry {
        Arc::clone(&self.registry)
    }
}

#[async_trait]
impl<N: PeerNotifier + 'static> PeerRegistryApi for PeerRegistryService<N> {
    async fn join_network(&self, new_node: NodeAddress) -> PeerRegistryResult<JoinOutcome> {
        // Snapshot existing peers and register under one write lock; the
        // lock is released before any outbound call.
        let (local, existing, newly_registered) = {
            let mut registry = self.registry.write();
            let existing: Vec<NodeAddress> = registry
                .list_peers()
                .into_iter()
                .filter(|peer| *peer != new_node)
                .collect();
            let newly_registered = registry.add_peer(new_node.clone());
            (registry.local().clone(), existing, newly_registered)
        };

        if !existing.is_empty() {
            let relay = PeerMessage::RegisterPeer(RegisterPeerRequest {
                new_node_address: new_node.clone(),
                source: local.clone(),
            });
            self.notifier.notify_all(&existing, relay).await;
        }

        let mut handed_over = Vec::with_capacity(existing.len() + 1);
        handed_over.push(local.clone());
        handed_over.extend(existing.iter().cloned());

        info!(
            new_node = %new_node,
            newly_registered,
            relayed = existing.len(),
            "[qc-01] Node joining through this node"
        );

        let handover = PeerMessage::RegisterAllPeers(RegisterAllPeersRequest {
            peer_addresses: handed_over.clone(),
            source: local,
        });
        if let Err(e) = self.notifier.notify(&new_node, handover).await {
            warn!(new_node = %new_node, error = %e, "[qc-01] Peer hand-over failed");
            return Err(e);
        }

        Ok(JoinOutcome {
            newly_registered,
            relayed_to: existing,
            handed_over,
        })
    }

    fn register_peer(&self, new_node: NodeAddress, source: &NodeAddress) -> bool {
        let added = self.registry.write().add_peer(new_node.clone());
        debug!(new_node = %new_node, source = %source, added, "[qc-01] RegisterPeer");
        added
    }

    fn register_all_peers(&self, peers: Vec<NodeAddress>, source: &NodeAddress) -> usize {
        let offered = peers.len();
        let added = self.registry.write().add_peers(peers);
        info!(source = %source, offered, added, "[qc-01] RegisterAllPeers");
        added
    }

    fn list_peers(&self) -> Vec<NodeAddress> {
        self.registry.read().list_peers()
    }

    fn local_address(&self) -> NodeAddress {
        self.registry.read().local().clone()
    }
}
