//! Domain errors for the Peer Registry.

use shared_types::NodeAddress;
use thiserror::Error;

/// Errors surfaced by peer registry operations.
///
/// Registration itself never fails: duplicates and self-additions are
/// silent no-ops. Only delivery to a specific peer can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerRegistryError {
    /// The peer could not be reached or answered with an error.
    #[error("Peer {peer} unreachable: {reason}")]
    Unreachable { peer: NodeAddress, reason: String },
}

/// Result type for peer registry operations.
pub type PeerRegistryResult<T> = Result<T, PeerRegistryError>;
