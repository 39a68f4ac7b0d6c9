//! Domain layer for the Peer Registry subsystem.

mod errors;
mod registry;

pub use errors::*;
pub use registry::*;
