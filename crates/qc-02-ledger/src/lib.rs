//! # Ledger Subsystem
//!
//! **Subsystem ID:** 2
//!
//! The committed block chain and the pool of transactions waiting for the
//! next block. The ledger never decides what gets committed: the consensus
//! engine builds a candidate from the pool and calls [`Ledger::append_block`]
//! once a quorum agreed on it.
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Fixed genesis | `chain[0]` is [`create_genesis_block`] on every node |
//! | Linkage | `chain[n].previous_hash == chain[n-1].hash` |
//! | Content digest | `block.hash == hash_block(id, previous_hash, transactions)` |
//! | Pool reset | The pending pool is cleared exactly when a block is appended |
//!
//! ## Example
//!
//! ```rust
//! use qc_02_ledger::Ledger;
//!
//! let ledger = Ledger::new();
//! let candidate = ledger.build_candidate_block().unwrap();
//!
//! assert_eq!(candidate.block_id, 2);
//! assert_eq!(candidate.previous_hash, ledger.last_block().hash);
//! ```

pub mod domain;

pub use domain::*;
