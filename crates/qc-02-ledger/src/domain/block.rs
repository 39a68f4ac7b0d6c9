//! Block and transaction construction, and the block digest.

use super::errors::LedgerResult;
use shared_crypto::Sha256Hasher;
use shared_types::{Amount, Block, Digest, NodeAddress, Transaction};

/// Fresh opaque transaction id: a v4 UUID as 32 lowercase hex chars.
pub fn generate_transaction_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Assemble a transaction. Pure construction: the signature is not checked.
pub fn create_transaction(
    sender: NodeAddress,
    recipient: NodeAddress,
    amount: Amount,
    signature: String,
    transaction_id: String,
) -> Transaction {
    Transaction {
        transaction_id,
        sender,
        recipient,
        amount,
        signature,
    }
}

/// The fixed genesis block.
pub fn create_genesis_block() -> Block {
    Block::genesis()
}

/// Digest of a block's content.
///
/// SHA-256 over `decimal(block_id) || previous_hash || json(transactions)`,
/// where the JSON is serde_json's compact rendering with fields in
/// declaration order. Every node must produce the same bytes here, so the
/// transaction field order is frozen.
pub fn hash_block(
    block_id: u64,
    previous_hash: &Digest,
    transactions: &[Transaction],
) -> LedgerResult<Digest> {
    let mut hasher = Sha256Hasher::new();
    hasher
        .update(block_id.to_string().as_bytes())
        .update(previous_hash.as_str().as_bytes());
    serde_json::to_writer(&mut hasher, transactions)?;
    Ok(Digest::new(hasher.finalize_hex()))
}

/// Recompute `block`'s digest and compare it with the one it carries.
pub fn digest_matches(block: &Block) -> LedgerResult<bool> {
    let recomputed = hash_block(block.block_id, &block.previous_hash, &block.transactions)?;
    Ok(recomputed == block.hash)
}
