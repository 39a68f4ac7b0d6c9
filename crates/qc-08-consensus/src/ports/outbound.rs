//! Driven ports (Outbound dependencies)

use async_trait::async_trait;
use shared_types::{NodeAddress, PeerMessage};

/// Fan-out of protocol messages to peers.
///
/// Fire-and-forget: implementations deliver to each peer independently,
/// log failures and never retry. The caller is not told who was reached.
#[async_trait]
pub trait PeerBroadcaster: Send + Sync {
    async fn broadcast(&self, peers: &[NodeAddress], message: PeerMessage);
}

/// Lookup of a node's published public key (hex compressed SEC1).
#[async_trait]
pub trait PublicKeyDirectory: Send + Sync {
    async fn fetch_public_key(&self, node: &NodeAddress) -> Result<String, String>;
}
