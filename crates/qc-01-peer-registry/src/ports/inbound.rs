//! # Driving Ports (Inbound API)
//!
//! Operations the gateway invokes on behalf of clients and peers.

use crate::domain::PeerRegistryResult;
use async_trait::async_trait;
use shared_types::NodeAddress;

/// Result of a JoinNetwork request handled by the entry node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Whether the new node was unknown before this request.
    pub newly_registered: bool,
    /// Peers the RegisterPeer relay was fanned out to.
    pub relayed_to: Vec<NodeAddress>,
    /// Peer set handed to the new node (entry node first).
    pub handed_over: Vec<NodeAddress>,
}

/// Primary Peer Registry API.
#[async_trait]
pub trait PeerRegistryApi: Send + Sync {
    /// Bring `new_node` into the network through this node.
    ///
    /// Registration and the relay to existing peers happen even if the
    /// hand-over to `new_node` fails; the error reports that failure.
    async fn join_network(&self, new_node: NodeAddress) -> PeerRegistryResult<JoinOutcome>;

    /// A peer announced a newly joined node. Returns whether it was new.
    fn register_peer(&self, new_node: NodeAddress, source: &NodeAddress) -> bool;

    /// The entry node handed over its peer set. Returns how many were new.
    fn register_all_peers(&self, peers: Vec<NodeAddress>, source: &NodeAddress) -> usize;

    /// Snapshot of known peers.
    fn list_peers(&self) -> Vec<NodeAddress>;

    /// This node's own address.
    fn local_address(&self) -> NodeAddress;
}
