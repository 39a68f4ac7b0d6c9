//! # qc-08-consensus
//!
//! Consensus subsystem for Quorum-Chain.
//!
//! ## Architecture
//!
//! One agreement round per block, in three phases, over a network of known
//! peers. Whichever node is asked to propose acts as primary for the view.
//!
//! ```text
//! Primary ──Preprepare{block}──→ every peer
//!                                   │ recompute digest, adopt candidate
//!             every peer ←──Prepare{digest}──┘
//!   2f matching prepares  ──Commit{digest}──→ every peer
//!   2f matching commits   → append block, clear pool, view + 1
//! ```
//!
//! `f = floor((peers + 1) / 3)`; each node counts its own vote, so the
//! tallies start at 1. A vote counts only if it carries the digest of the
//! candidate this node holds and the current view; each sender counts once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_08_consensus::{ConsensusConfig, ConsensusDependencies, ConsensusService};
//!
//! let service = ConsensusService::new(ConsensusDependencies {
//!     broadcaster,
//!     key_directory,
//!     identity,
//!     peers,
//!     config: ConsensusConfig::default(),
//! });
//!
//! let proposal = service.propose_block().await?;
//! ```
//!
//! ## Known gaps
//!
//! - Prepare/Commit senders are not authenticated; a peer can vote under
//!   another peer's address.
//! - There is no view change. A crashed primary stalls its round until the
//!   optional round timeout abandons it.

pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;

// Re-export main types
pub use domain::{
    max_faulty, quorum_threshold, ConsensusConfig, ConsensusError, ConsensusResult, Phase,
    Proposal, RoundState, VoteOutcome, VoteTracker,
};
pub use ports::{ConsensusApi, PeerBroadcaster, PublicKeyDirectory};
pub use service::{ConsensusDependencies, ConsensusService};
pub use state::ConsensusState;
