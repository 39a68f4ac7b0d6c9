//! # Error Types
//!
//! Errors raised while validating values at the network boundary.

use thiserror::Error;

/// Why a string could not be parsed as a [`crate::NodeAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Address is empty.
    #[error("Node address is empty")]
    Empty,

    /// Address contains whitespace.
    #[error("Node address contains whitespace: {0:?}")]
    Whitespace(String),

    /// Address is not an http(s) URL.
    #[error("Unsupported scheme in node address {0:?}: expected http:// or https://")]
    UnsupportedScheme(String),

    /// Scheme present but nothing after it.
    #[error("Node address has no host: {0:?}")]
    MissingHost(String),
}
