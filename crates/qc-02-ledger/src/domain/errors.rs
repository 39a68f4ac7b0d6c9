//! Ledger errors.

use thiserror::Error;

/// Errors surfaced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Transactions could not be rendered to canonical JSON.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A transaction with this id is already pending or committed.
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),

    /// `chain[0]` is not the fixed genesis block.
    #[error("Invalid genesis block")]
    InvalidGenesis,

    /// A block does not point at its predecessor's digest.
    #[error("Block {block_id} does not link to its predecessor")]
    BrokenLink { block_id: u64 },

    /// A block's stored digest differs from its recomputed digest.
    #[error("Block {block_id} digest mismatch")]
    HashMismatch { block_id: u64 },

    /// Block ids are not consecutive.
    #[error("Block id {found} found where {expected} was expected")]
    UnexpectedBlockId { expected: u64, found: u64 },
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
