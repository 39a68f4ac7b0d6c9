//! # Shared Crypto - Node Identity Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Block digests |
//! | `ecdsa` | secp256k1 | Transaction signing and verification |
//! | `identity` | secp256k1 | Per-node key pair bound to the node address |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization
//! - Private key material never leaves [`NodeIdentity`]; only the
//!   compressed public key is exported.
//! - Verification never panics on attacker-supplied hex: malformed input
//!   simply fails to verify.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod identity;

// Re-exports
pub use ecdsa::{verify, Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::{CryptoError, CryptoResult};
pub use hashing::{sha256_hex, Sha256Hasher};
pub use identity::NodeIdentity;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
