//! Domain layer for the Ledger subsystem.

mod block;
mod errors;
mod ledger;

pub use block::*;
pub use errors::*;
pub use ledger::*;
