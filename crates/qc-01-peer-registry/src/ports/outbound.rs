//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the host application implements for the Peer Registry.

use crate::domain::PeerRegistryResult;
use async_trait::async_trait;
use shared_types::{NodeAddress, PeerMessage};

/// Delivery of registry messages to other nodes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the service is shared across
/// request handlers.
#[async_trait]
pub trait PeerNotifier: Send + Sync {
    /// Fan `message` out to every address in `peers`.
    ///
    /// Fire-and-forget: must return without waiting on any individual peer.
    /// Failures are the adapter's to log.
    async fn notify_all(&self, peers: &[NodeAddress], message: PeerMessage);

    /// Deliver `message` to one peer and wait for it to be acknowledged.
    async fn notify(&self, peer: &NodeAddress, message: PeerMessage) -> PeerRegistryResult<()>;
}
