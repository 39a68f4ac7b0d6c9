//! Committed chain plus pending pool.

use super::block::{create_genesis_block, digest_matches, hash_block};
use super::errors::{LedgerError, LedgerResult};
use shared_types::{Block, Transaction};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The local node's copy of the chain and its pending pool.
///
/// INVARIANT: `chain` is never empty; `chain[0]` is genesis.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    committed_ids: HashSet<String>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// A ledger holding only the genesis block and an empty pool.
    pub fn new() -> Self {
        Self {
            chain: vec![create_genesis_block()],
            pending: Vec::new(),
            committed_ids: HashSet::new(),
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Number of blocks, genesis included.
    pub fn height(&self) -> usize {
        self.chain.len()
    }

    /// The chain tip. Genesis when nothing has been committed.
    pub fn last_block(&self) -> &Block {
        // chain is non-empty from construction on
        &self.chain[self.chain.len() - 1]
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    /// True when `transaction_id` is pending or already committed.
    pub fn knows_transaction(&self, transaction_id: &str) -> bool {
        self.committed_ids.contains(transaction_id)
            || self
                .pending
                .iter()
                .any(|tx| tx.transaction_id == transaction_id)
    }

    /// Queue a transaction for the next candidate block.
    pub fn add_pending_transaction(&mut self, transaction: Transaction) -> LedgerResult<()> {
        if self.knows_transaction(&transaction.transaction_id) {
            return Err(LedgerError::DuplicateTransaction(transaction.transaction_id));
        }
        debug!(
            transaction_id = %transaction.transaction_id,
            pending = self.pending.len() + 1,
            "[qc-02] Transaction pending"
        );
        self.pending.push(transaction);
        Ok(())
    }

    /// Package the pending pool into the block that would follow the tip.
    ///
    /// Neither the chain nor the pool is touched.
    pub fn build_candidate_block(&self) -> LedgerResult<Block> {
        let last = self.last_block();
        let block_id = self.chain.len() as u64 + 1;
        let transactions = self.pending.clone();
        let hash = hash_block(block_id, &last.hash, &transactions)?;
        Ok(Block {
            block_id,
            transactions,
            previous_hash: last.hash.clone(),
            hash,
        })
    }

    /// Append a committed block and clear the pending pool.
    ///
    /// The block is appended even if it does not extend the local tip; a
    /// broken link shows up in [`Ledger::verify_chain`].
    pub fn append_block(&mut self, block: Block) {
        let tip = self.last_block();
        if block.previous_hash != tip.hash {
            warn!(
                block_id = block.block_id,
                expected = %tip.hash.short(),
                found = %block.previous_hash.short(),
                "[qc-02] Appending block that does not extend the local tip"
            );
        }
        self.committed_ids.extend(
            block
                .transactions
                .iter()
                .map(|tx| tx.transaction_id.clone()),
        );
        debug!(
            block_id = block.block_id,
            transactions = block.transactions.len(),
            dropped_pending = self.pending.len().saturating_sub(block.transactions.len()),
            "[qc-02] Block appended"
        );
        self.chain.push(block);
        self.pending.clear();
    }

    /// Check genesis, consecutive ids, linkage and every recomputed digest.
    pub fn verify_chain(&self) -> LedgerResult<()> {
        let mut blocks = self.chain.iter();
        match blocks.next() {
            Some(genesis) if *genesis == create_genesis_block() => {}
            _ => return Err(LedgerError::InvalidGenesis),
        }

        for (prev, block) in self.chain.iter().zip(blocks) {
            let expected = prev.block_id + 1;
            if block.block_id != expected {
                return Err(LedgerError::UnexpectedBlockId {
                    expected,
                    found: block.block_id,
                });
            }
            if block.previous_hash != prev.hash {
                return Err(LedgerError::BrokenLink {
                    block_id: block.block_id,
                });
            }
            if !digest_matches(block)? {
                return Err(LedgerError::HashMismatch {
                    block_id: block.block_id,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::create_transaction;
    use shared_types::{Digest, NodeAddress};

    fn addr(port: u16) -> NodeAddress {
        NodeAddress::parse(&format!("http://localhost:{}", port)).unwrap()
    }

    fn tx(id: &str) -> Transaction {
        create_transaction(addr(3001), addr(3002), 5.into(), "00".repeat(64), id.into())
    }

    #[test]
    fn test_new_ledger_holds_genesis() {
        let ledger = Ledger::new();

        assert_eq!(ledger.height(), 1);
        assert!(ledger.last_block().is_genesis());
        assert!(ledger.pending_transactions().is_empty());
        assert!(ledger.verify_chain().is_ok());
    }

    #[test]
    fn test_candidate_does_not_mutate() {
        let mut ledger = Ledger::new();
        ledger.add_pending_transaction(tx("a")).unwrap();

        let candidate = ledger.build_candidate_block().unwrap();

        assert_eq!(candidate.block_id, 2);
        assert_eq!(candidate.previous_hash, Digest::genesis());
        assert_eq!(candidate.transactions, vec![tx("a")]);
        assert_eq!(ledger.height(), 1);
        assert_eq!(ledger.pending_transactions().len(), 1);
    }

    #[test]
    fn test_append_clears_pool_and_links() {
        let mut ledger = Ledger::new();
        ledger.add_pending_transaction(tx("a")).unwrap();
        ledger.add_pending_transaction(tx("b")).unwrap();

        let first = ledger.build_candidate_block().unwrap();
        ledger.append_block(first.clone());
        let second = ledger.build_candidate_block().unwrap();
        ledger.append_block(second.clone());

        assert_eq!(ledger.height(), 3);
        assert!(ledger.pending_transactions().is_empty());
        assert_eq!(second.previous_hash, first.hash);
        assert!(second.transactions.is_empty());
        assert!(ledger.verify_chain().is_ok());
    }

    #[test]
    fn test_duplicate_transactions_rejected() {
        let mut ledger = Ledger::new();
        ledger.add_pending_transaction(tx("a")).unwrap();

        assert_eq!(
            ledger.add_pending_transaction(tx("a")),
            Err(LedgerError::DuplicateTransaction("a".into()))
        );

        let block = ledger.build_candidate_block().unwrap();
        ledger.append_block(block);

        assert!(ledger.knows_transaction("a"));
        assert!(matches!(
            ledger.add_pending_transaction(tx("a")),
            Err(LedgerError::DuplicateTransaction(_))
        ));
    }

    #[test]
    fn test_verify_chain_detects_broken_link() {
        let mut ledger = Ledger::new();
        let mut block = ledger.build_candidate_block().unwrap();
        block.previous_hash = Digest::new("ff");
        block.hash = hash_block(block.block_id, &block.previous_hash, &[]).unwrap();
        ledger.append_block(block);

        assert_eq!(
            ledger.verify_chain(),
            Err(LedgerError::BrokenLink { block_id: 2 })
        );
    }

    #[test]
    fn test_verify_chain_detects_tampered_digest() {
        let mut ledger = Ledger::new();
        ledger.add_pending_transaction(tx("a")).unwrap();
        let mut block = ledger.build_candidate_block().unwrap();
        block.transactions[0].amount = 999.into();
        ledger.append_block(block);

        assert_eq!(
            ledger.verify_chain(),
            Err(LedgerError::HashMismatch { block_id: 2 })
        );
    }
}
