//! # Node Runtime Library
//!
//! Exposes the runtime pieces of the `node-runtime` binary for testing.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `QC_*` environment, CLI flags)
//! 2. Generate the node identity and wire the subsystems
//! 3. Bind and serve the gateway
//! 4. Start the round timer (only when a round timeout is configured)
//! 5. Join the network through the bootstrap peer, if one is configured
//! 6. Serve until the shutdown signal, then drain in-flight requests

pub mod container;
pub mod runtime;

pub use container::{ConfigError, NodeConfig, SubsystemContainer};
pub use runtime::NodeRuntime;
