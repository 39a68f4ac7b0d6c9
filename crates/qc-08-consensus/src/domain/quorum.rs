//! Quorum arithmetic.
//!
//! A node knows `peer_count` peers, so the network has `peer_count + 1`
//! members. It tolerates `f = floor((peer_count + 1) / 3)` faulty members
//! and a phase completes once `2f` matching votes are held, the local
//! node's own vote included.

/// Tolerated faulty members for a node with `peer_count` peers.
pub fn max_faulty(peer_count: usize) -> usize {
    (peer_count + 1) / 3
}

/// Matching votes needed to close a phase.
pub fn quorum_threshold(peer_count: usize) -> usize {
    2 * max_faulty(peer_count)
}
