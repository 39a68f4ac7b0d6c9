//! Consensus Service - Core business logic
//!
//! # Architecture
//! - One [`ConsensusState`] behind one lock; handlers compute the transition,
//!   release the lock, and only then talk to peers.
//! - Outbound traffic goes through [`PeerBroadcaster`] (fire-and-forget) and
//!   [`PublicKeyDirectory`] (key lookup before the lock is taken).
//! - Threshold is `2f` with `f = floor((peers + 1) / 3)`, re-read from the
//!   peer registry on every vote.

use crate::domain::{ConsensusConfig, ConsensusError, ConsensusResult, Proposal, VoteOutcome};
use crate::metrics;
use crate::ports::{ConsensusApi, PeerBroadcaster, PublicKeyDirectory};
use crate::state::ConsensusState;
use async_trait::async_trait;
use parking_lot::Mutex;
use qc_01_peer_registry::SharedPeerRegistry;
use qc_02_ledger::{create_transaction, generate_transaction_id};
use shared_crypto::NodeIdentity;
use shared_types::{
    Amount, Digest, NodeAddress, NodeStatus, PeerMessage, PhaseVote, PrePrepareMessage,
    Transaction,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};


/// Consensus Service
pub struct ConsensusService<B, K>
where
    B: PeerBroadcaster,
    K: PublicKeyDirectory,
{
    broadcaster: Arc<B>,
    key_directory: Arc<K>,
    identity: Arc<NodeIdentity>,
    peers: SharedPeerRegistry,
    state: Mutex<ConsensusState>,
    config: ConsensusConfig,
}

/// Dependencies for ConsensusService
pub struct ConsensusDependencies<B, K> {
    pub broadcaster: Arc<B>,
    pub key_directory: Arc<K>,
    pub identity: Arc<NodeIdentity>,
    pub peers: SharedPeerRegistry,
    pub config: ConsensusConfig,
}

impl<B, K> ConsensusService<B, K>
where
    B: PeerBroadcaster,
    K: PublicKeyDirectory,
{
    /// Create a new ConsensusService at view 1 with a genesis-only chain.
    pub fn new(deps: ConsensusDependencies<B, K>) -> Self {
        let state = ConsensusState::new(deps.identity.address().clone());
        Self {
            broadcaster: deps.broadcaster,
            key_directory: deps.key_directory,
            identity: deps.identity,
            peers: deps.peers,
            state: Mutex::new(state),
            config: deps.config,
        }
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Run `f` against a read-only view of the state.
    pub fn inspect<R>(&self, f: impl FnOnce(&ConsensusState) -> R) -> R {
        f(&self.state.lock())
    }

    fn local(&self) -> &NodeAddress {
        self.identity.address()
    }

    fn peer_count(&self) -> usize {
        self.peers.read().len()
    }

    async fn broadcast(&self, message: PeerMessage) {
        let peers = self.peers.read().list_peers();
        if peers.is_empty() {
            debug!(kind = message.kind(), "[qc-08] No peers to broadcast to");
            return;
        }
        self.broadcaster.broadcast(&peers, message).await;
    }

    /// Verify `transaction` against its sender's published key.
    ///
    /// The key is fetched before any lock is taken.
    async fn verify_transaction(&self, transaction: &Transaction) -> ConsensusResult<()> {
        let payload = transaction.signing_payload();
        let valid = if transaction.sender == *self.local() {
            self.identity.verify_own(&payload, &transaction.signature)
        } else {
            let public_key = self
                .key_directory
                .fetch_public_key(&transaction.sender)
                .await
                .map_err(|reason| ConsensusError::KeyFetchFailed {
                    peer: transaction.sender.clone(),
                    reason,
                })?;
            shared_crypto::verify(&payload, &transaction.signature, &public_key)
        };

        if valid {
            Ok(())
        } else {
            Err(ConsensusError::InvalidSignature {
                transaction_id: transaction.transaction_id.clone(),
                sender: transaction.sender.clone(),
            })
        }
    }
}

#[async_trait]
impl<B, K> ConsensusApi for ConsensusService<B, K>
where
    B: PeerBroadcaster + 'static,
    K: PublicKeyDirectory + 'static,
{
    async fn propose_block(&self) -> ConsensusResult<Proposal> {
        let (block, view) = {
            let mut state = self.state.lock();
            let block = state.propose(Instant::now())?;
            (block, state.round.view())
        };

        info!(
            view,
            block_id = block.block_id,
            digest = %block.hash.short(),
            transactions = block.transactions.len(),
            "[qc-08] Proposing block as primary"
        );

        self.broadcast(PeerMessage::PrePrepare(PrePrepareMessage {
            block: block.clone(),
            view,
            primary: self.local().clone(),
        }))
        .await;

        Ok(Proposal { block, view })
    }

    async fn on_preprepare(&self, message: PrePrepareMessage) -> ConsensusResult<Digest> {
        let PrePrepareMessage {
            block,
            view,
            primary,
        } = message;
        let block_id = block.block_id;

        let (digest, current_view) = {
            let mut state = self.state.lock();
            match state.accept_preprepare(block, Instant::now()) {
                Ok(digest) => (digest, state.round.view()),
                Err(e) => {
                    warn!(
                        primary = %primary,
                        view,
                        block_id,
                        error = %e,
                        "[qc-08] Rejected preprepare"
                    );
                    metrics::record_preprepare_rejected(e.reason());
                    return Err(e);
                }
            }
        };

        if view != current_view {
            debug!(view, current_view, "[qc-08] Preprepare for a different view");
        }
        info!(
            primary = %primary,
            view,
            block_id,
            digest = %digest.short(),
            "[qc-08] Adopted candidate, sending prepare"
        );

        self.broadcast(PeerMessage::Prepare(PhaseVote {
            digest: digest.clone(),
            view,
            primary,
            sender: self.local().clone(),
        }))
        .await;

        Ok(digest)
    }

    async fn on_prepare(&self, vote: PhaseVote) -> VoteOutcome {
        let peer_count = self.peer_count();
        let outcome = self.state.lock().on_prepare(&vote, peer_count);

        match outcome {
            VoteOutcome::Stale | VoteOutcome::Duplicate => {
                debug!(sender = %vote.sender, view = vote.view, ?outcome, "[qc-08] Ignored prepare");
                metrics::record_stale_vote("prepare");
            }
            VoteOutcome::Counted { count, threshold } => {
                debug!(sender = %vote.sender, count, threshold, "[qc-08] Prepare counted");
                metrics::record_vote_counted("prepare");
            }
            VoteOutcome::QuorumReached { count, threshold } => {
                metrics::record_vote_counted("prepare");
                info!(
                    view = vote.view,
                    count,
                    threshold,
                    digest = %vote.digest.short(),
                    "[qc-08] Prepare quorum reached, sending commit"
                );
                self.broadcast(PeerMessage::Commit(PhaseVote {
                    digest: vote.digest.clone(),
                    view: vote.view,
                    primary: vote.primary.clone(),
                    sender: self.local().clone(),
                }))
                .await;
            }
        }
        outcome
    }

    async fn on_commit(&self, vote: PhaseVote) -> VoteOutcome {
        let peer_count = self.peer_count();
        let (outcome, height) = {
            let mut state = self.state.lock();
            let outcome = state.on_commit(&vote, peer_count);
            (outcome, state.ledger.height())
        };

        match outcome {
            VoteOutcome::Stale | VoteOutcome::Duplicate => {
                debug!(sender = %vote.sender, view = vote.view, ?outcome, "[qc-08] Ignored commit");
                metrics::record_stale_vote("commit");
            }
            VoteOutcome::Counted { count, threshold } => {
                debug!(sender = %vote.sender, count, threshold, "[qc-08] Commit counted");
                metrics::record_vote_counted("commit");
            }
            VoteOutcome::QuorumReached { count, threshold } => {
                metrics::record_vote_counted("commit");
                metrics::record_block_committed();
                info!(
                    view = vote.view,
                    count,
                    threshold,
                    height,
                    digest = %vote.digest.short(),
                    "[qc-08] Block committed"
                );
            }
        }
        outcome
    }

    async fn submit_transaction(
        &self,
        recipient: NodeAddress,
        amount: Amount,
    ) -> ConsensusResult<Transaction> {
        let transaction_id = generate_transaction_id();
        let signature = self
            .identity
            .sign_transaction_payload(&recipient, &amount, &transaction_id);
        let transaction = create_transaction(
            self.local().clone(),
            recipient,
            amount,
            signature,
            transaction_id,
        );

        self.state.lock().add_transaction(transaction.clone())?;
        metrics::record_transaction("accepted");
        info!(
            transaction_id = %transaction.transaction_id,
            recipient = %transaction.recipient,
            amount = %transaction.amount,
            "[qc-08] Transaction submitted"
        );

        self.broadcast(PeerMessage::AddTransaction(transaction.clone()))
            .await;
        Ok(transaction)
    }

    async fn add_transaction(&self, transaction: Transaction) -> ConsensusResult<()> {
        let transaction_id = transaction.transaction_id.clone();
        let sender = transaction.sender.clone();

        let result = match self.verify_transaction(&transaction).await {
            Ok(()) => self.state.lock().add_transaction(transaction),
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => {
                metrics::record_transaction("accepted");
                info!(transaction_id = %transaction_id, sender = %sender, "[qc-08] Transaction accepted");
            }
            Err(e) => {
                metrics::record_transaction(e.reason());
                warn!(
                    transaction_id = %transaction_id,
                    sender = %sender,
                    error = %e,
                    "[qc-08] Transaction dropped"
                );
            }
        }
        result
    }

    fn status(&self) -> NodeStatus {
        let peers = self.peers.read().list_peers();
        let state = self.state.lock();
        NodeStatus {
            address: self.local().clone(),
            public_key: self.identity.export_public_key().to_string(),
            view: state.round.view(),
            chain: state.ledger.chain().to_vec(),
            pending_transactions: state.ledger.pending_transactions().to_vec(),
            peers,
            chain_valid: state.ledger.verify_chain().is_ok(),
        }
    }

    fn current_view(&self) -> u64 {
        self.state.lock().round.view()
    }

    fn expire_stalled_round(&self, now: Instant) -> bool {
        let Some(timeout) = self.config.round_timeout else {
            return false;
        };
        match self.state.lock().expire_if_stalled(now, timeout) {
            Some(view) => {
                metrics::record_round_expired();
                warn!(view, timeout_secs = timeout.as_secs(), "[qc-08] Abandoned stalled round");
                true
            }
            None => false,
        }
    }
}
