//! # Subsystem Container
//!
//! Configuration and dependency injection for one node.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NetworkConfig, NodeConfig};
pub use subsystems::{NodeConsensus, NodeRegistry, SubsystemContainer};
