//! # Shared Types Crate
//!
//! This crate contains the ledger entities and the request/response schemas
//! exchanged between Quorum-Chain nodes.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every value that crosses the network is
//!   defined here, once.
//! - **Values, not references**: nodes never share state, they exchange
//!   owned copies of these types serialized as camelCase JSON.
//! - **Validated at the edge**: addresses are parsed into [`NodeAddress`]
//!   before they reach any state machine.

pub mod entities;
pub mod errors;
pub mod ipc;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
