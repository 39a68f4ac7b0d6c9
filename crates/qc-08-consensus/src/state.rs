//! Mutable state of the Consensus Service.
//!
//! The ledger and the round state live together so that a commit can append
//! the candidate, clear the pool and advance the view in one step under one
//! lock. Every method here is synchronous; the service never awaits while
//! holding the lock.

use crate::domain::{quorum_threshold, ConsensusError, ConsensusResult, RoundState, VoteOutcome};
use qc_02_ledger::{hash_block, Ledger};
use shared_types::{Block, Digest, NodeAddress, PhaseVote, Transaction};
use std::time::{Duration, Instant};

/// Ledger plus round state for the local node.
#[derive(Debug, Clone)]
pub struct ConsensusState {
    pub ledger: Ledger,
    pub round: RoundState,
}

impl ConsensusState {
    pub fn new(local: NodeAddress) -> Self {
        Self {
            ledger: Ledger::new(),
            round: RoundState::new(local),
        }
    }

    /// Build the next candidate from the pool and hold it as primary.
    pub fn propose(&mut self, now: Instant) -> ConsensusResult<Block> {
        let block = self.ledger.build_candidate_block()?;
        self.round.adopt(block.clone(), now);
        Ok(block)
    }

    /// Recompute the digest of a proposed block and adopt it if it matches.
    ///
    /// On mismatch nothing changes.
    pub fn accept_preprepare(&mut self, block: Block, now: Instant) -> ConsensusResult<Digest> {
        let recomputed = hash_block(block.block_id, &block.previous_hash, &block.transactions)?;
        if recomputed != block.hash {
            return Err(ConsensusError::DigestMismatch {
                carried: block.hash,
                recomputed,
            });
        }
        self.round.adopt(block, now);
        Ok(recomputed)
    }

    pub fn on_prepare(&mut self, vote: &PhaseVote, peer_count: usize) -> VoteOutcome {
        self.round
            .record_prepare(vote, quorum_threshold(peer_count))
    }

    /// Count a Commit; on quorum append the candidate and open the next view.
    pub fn on_commit(&mut self, vote: &PhaseVote, peer_count: usize) -> VoteOutcome {
        let outcome = self
            .round
            .record_commit(vote, quorum_threshold(peer_count));
        if outcome.reached_quorum() {
            if let Some(block) = self.round.finish() {
                self.ledger.append_block(block);
            }
        }
        outcome
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> ConsensusResult<()> {
        self.ledger.add_pending_transaction(transaction)?;
        Ok(())
    }

    /// Abandon a round that has held its candidate for longer than
    /// `timeout`. Returns the view that was abandoned.
    pub fn expire_if_stalled(&mut self, now: Instant, timeout: Duration) -> Option<u64> {
        if !self.round.is_stalled(now, timeout) {
            return None;
        }
        let view = self.round.view();
        self.round.reset();
        Some(view)
    }
}
