//! Domain layer for the Consensus subsystem.
//!
//! - `quorum`: fault tolerance and vote threshold for a given network size
//! - `round`: per-view round state and per-phase vote tracking
//! - `config`: engine tuning knobs

mod config;
mod error;
mod quorum;
mod round;

pub use config::*;
pub use error::*;
pub use quorum::*;
pub use round::*;
