//! Error types for the Consensus subsystem.

use qc_02_ledger::LedgerError;
use shared_types::{Digest, NodeAddress};

/// Consensus error types.
///
/// None of these is fatal to the node: each one drops or rejects a single
/// message and leaves the round state as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    #[error("Block digest mismatch: carried {carried}, recomputed {recomputed}")]
    DigestMismatch { carried: Digest, recomputed: Digest },

    #[error("Invalid signature on transaction {transaction_id} from {sender}")]
    InvalidSignature {
        transaction_id: String,
        sender: NodeAddress,
    },

    #[error("Could not fetch public key of {peer}: {reason}")]
    KeyFetchFailed { peer: NodeAddress, reason: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl ConsensusError {
    /// Short label for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::DigestMismatch { .. } => "digest_mismatch",
            Self::InvalidSignature { .. } => "invalid_signature",
            Self::KeyFetchFailed { .. } => "key_fetch_failed",
            Self::Ledger(LedgerError::DuplicateTransaction(_)) => "duplicate_transaction",
            Self::Ledger(_) => "ledger",
        }
    }
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
