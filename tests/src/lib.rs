//! # Quorum-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/network.rs    # In-memory multi-node network
//! ├── src/integration/  # Cross-subsystem scenarios on that network
//! └── benches/          # Ledger hashing and chain verification
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod integration;
pub mod network;

pub use network::{InMemoryNetwork, SimNode};
