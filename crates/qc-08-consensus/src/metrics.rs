//! # Consensus Metrics
//!
//! Prometheus metrics for monitoring agreement rounds.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-08-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `consensus_blocks_committed_total` - Blocks appended after a commit quorum
//! - `consensus_preprepares_rejected_total` - Rejected proposals (by reason)
//! - `consensus_votes_counted_total` - Counted votes (by phase)
//! - `consensus_stale_votes_total` - Ignored stale or duplicate votes (by phase)
//! - `consensus_transactions_total` - Incoming transactions (by outcome)
//! - `consensus_rounds_expired_total` - Rounds abandoned by the round timeout

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Blocks appended after a commit quorum
    pub static ref BLOCKS_COMMITTED: IntCounter = register_int_counter!(
        "consensus_blocks_committed_total",
        "Total number of blocks committed"
    )
    .expect("Failed to create BLOCKS_COMMITTED metric");

    /// Preprepares rejected, labeled by reason
    pub static ref PREPREPARES_REJECTED: IntCounterVec = register_int_counter_vec!(
        "consensus_preprepares_rejected_total",
        "Total number of proposed blocks rejected",
        &["reason"]
    )
    .expect("Failed to create PREPREPARES_REJECTED metric");

    /// Votes counted toward a quorum, labeled by phase
    pub static ref VOTES_COUNTED: IntCounterVec = register_int_counter_vec!(
        "consensus_votes_counted_total",
        "Total number of prepare/commit votes counted",
        &["phase"]
    )
    .expect("Failed to create VOTES_COUNTED metric");

    /// Votes ignored as stale or duplicate, labeled by phase
    pub static ref STALE_VOTES: IntCounterVec = register_int_counter_vec!(
        "consensus_stale_votes_total",
        "Total number of prepare/commit votes ignored",
        &["phase"]
    )
    .expect("Failed to create STALE_VOTES metric");

    /// Incoming transactions, labeled by outcome
    pub static ref TRANSACTIONS: IntCounterVec = register_int_counter_vec!(
        "consensus_transactions_total",
        "Total number of transactions received",
        &["outcome"]
    )
    .expect("Failed to create TRANSACTIONS metric");

    /// Rounds abandoned by the round timeout
    pub static ref ROUNDS_EXPIRED: IntCounter = register_int_counter!(
        "consensus_rounds_expired_total",
        "Total number of stalled rounds abandoned"
    )
    .expect("Failed to create ROUNDS_EXPIRED metric");
}

/// Record a committed block
#[cfg(feature = "metrics")]
pub fn record_block_committed() {
    BLOCKS_COMMITTED.inc();
}

/// Record a rejected preprepare with reason
#[cfg(feature = "metrics")]
pub fn record_preprepare_rejected(reason: &str) {
    PREPREPARES_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_vote_counted(phase: &str) {
    VOTES_COUNTED.with_label_values(&[phase]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_stale_vote(phase: &str) {
    STALE_VOTES.with_label_values(&[phase]).inc();
}

/// Record a transaction outcome ("accepted" or an error reason)
#[cfg(feature = "metrics")]
pub fn record_transaction(outcome: &str) {
    TRANSACTIONS.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_round_expired() {
    ROUNDS_EXPIRED.inc();
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_block_committed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_preprepare_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote_counted(_phase: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_stale_vote(_phase: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_transaction(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_round_expired() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        // These should compile and run without panic even without metrics feature
        record_block_committed();
        record_preprepare_rejected("digest_mismatch");
        record_vote_counted("prepare");
        record_stale_vote("commit");
        record_transaction("accepted");
        record_round_expired();
    }
}
