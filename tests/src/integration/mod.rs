//! # Integration Scenarios
//!
//! Every scenario runs real consensus and registry services over the
//! in-memory network, so the full message flow is exercised without HTTP.

pub mod consensus_flow;
pub mod peer_join;
