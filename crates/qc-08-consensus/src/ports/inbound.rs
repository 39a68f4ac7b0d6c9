//! Driving ports (Inbound API)

use crate::domain::{ConsensusResult, Proposal, VoteOutcome};
use async_trait::async_trait;
use shared_types::{
    Amount, Digest, NodeAddress, NodeStatus, PhaseVote, PrePrepareMessage, Transaction,
};
use std::time::Instant;

/// Primary Consensus API, called by the gateway for every protocol message.
#[async_trait]
pub trait ConsensusApi: Send + Sync {
    /// Package the pending pool into a candidate and broadcast Preprepare,
    /// acting as primary for the current view.
    async fn propose_block(&self) -> ConsensusResult<Proposal>;

    /// Check and adopt a proposed block, then broadcast Prepare.
    ///
    /// Returns the adopted digest, or `DigestMismatch` when the block's
    /// carried hash does not match its content.
    async fn on_preprepare(&self, message: PrePrepareMessage) -> ConsensusResult<Digest>;

    /// Count a Prepare; broadcasts Commit the first time quorum is reached.
    async fn on_prepare(&self, vote: PhaseVote) -> VoteOutcome;

    /// Count a Commit; appends the candidate on quorum.
    async fn on_commit(&self, vote: PhaseVote) -> VoteOutcome;

    /// Create and sign a transaction from the local node, pool it and
    /// forward it to every peer.
    async fn submit_transaction(
        &self,
        recipient: NodeAddress,
        amount: Amount,
    ) -> ConsensusResult<Transaction>;

    /// Verify a transaction forwarded by a peer against its sender's
    /// published key and pool it.
    async fn add_transaction(&self, transaction: Transaction) -> ConsensusResult<()>;

    /// Snapshot for the status query.
    fn status(&self) -> NodeStatus;

    fn current_view(&self) -> u64;

    /// Abandon the current round if it has stalled past the configured
    /// timeout. Returns `true` if a round was abandoned.
    fn expire_stalled_round(&self, now: Instant) -> bool;
}
