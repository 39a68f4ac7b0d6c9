//! Known-peer set.

use parking_lot::RwLock;
use shared_types::NodeAddress;
use std::sync::Arc;

/// Registry handle shared between the join service and the consensus engine.
pub type SharedPeerRegistry = Arc<RwLock<PeerRegistry>>;

/// Create a shared registry for `local`.
pub fn shared_registry(local: NodeAddress) -> SharedPeerRegistry {
    Arc::new(RwLock::new(PeerRegistry::new(local)))
}

/// Distinct peer addresses in insertion order.
///
/// INVARIANT: never contains the local address, never contains duplicates.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    local: NodeAddress,
    peers: Vec<NodeAddress>,
}

impl PeerRegistry {
    pub fn new(local: NodeAddress) -> Self {
        Self {
            local,
            peers: Vec::new(),
        }
    }

    /// The node this registry belongs to.
    pub fn local(&self) -> &NodeAddress {
        &self.local
    }

    /// Register `address`. Returns `false` when it is the local node or
    /// already known, in which case nothing changes.
    pub fn add_peer(&mut self, address: NodeAddress) -> bool {
        if address == self.local || self.contains(&address) {
            return false;
        }
        self.peers.push(address);
        true
    }

    /// Register every address, returning how many were new.
    pub fn add_peers<I>(&mut self, addresses: I) -> usize
    where
        I: IntoIterator<Item = NodeAddress>,
    {
        addresses
            .into_iter()
            .filter(|address| self.add_peer(address.clone()))
            .count()
    }

    pub fn contains(&self, address: &NodeAddress) -> bool {
        self.peers.iter().any(|p| p == address)
    }

    /// Snapshot of all peers. Callers must not assume they are reachable.
    pub fn list_peers(&self) -> Vec<NodeAddress> {
        self.peers.clone()
    }

    /// Number of registered peers (network size minus self).
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
