//! # Node Identity
//!
//! One secp256k1 key pair per node process, generated at startup and bound
//! to the address the node advertises. Peers fetch the public key by address
//! and use it to check transactions claiming this node as sender.

use crate::ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey};
use shared_types::{signing_payload, Amount, NodeAddress};

/// Local node identity.
pub struct NodeIdentity {
    address: NodeAddress,
    keypair: Secp256k1KeyPair,
    public_key_hex: String,
}

impl NodeIdentity {
    /// Generate a fresh identity for `address`.
    pub fn generate(address: NodeAddress) -> Self {
        Self::from_keypair(address, Secp256k1KeyPair::generate())
    }

    /// Bind an existing key pair to `address`.
    pub fn from_keypair(address: NodeAddress, keypair: Secp256k1KeyPair) -> Self {
        let public_key_hex = keypair.public_key().to_hex();
        Self {
            address,
            keypair,
            public_key_hex,
        }
    }

    /// Address this node advertises to its peers.
    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    /// Compressed public half of the key pair.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        self.keypair.public_key()
    }

    /// Transport encoding of the public key.
    pub fn export_public_key(&self) -> &str {
        &self.public_key_hex
    }

    /// Sign an arbitrary payload, returning hex r||s.
    pub fn sign(&self, payload: &[u8]) -> String {
        self.keypair.sign(payload).to_hex()
    }

    /// Sign the canonical transaction payload with this node as sender.
    pub fn sign_transaction_payload(
        &self,
        recipient: &NodeAddress,
        amount: &Amount,
        transaction_id: &str,
    ) -> String {
        self.sign(&signing_payload(&self.address, recipient, amount, transaction_id))
    }

    /// Check a signature against this node's own public key.
    pub fn verify_own(&self, payload: &[u8], signature: &str) -> bool {
        crate::verify(payload, signature, &self.public_key_hex)
    }
}

impl std::fmt::Debug for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIdentity")
            .field("address", &self.address)
            .field("public_key", &self.public_key_hex)
            .finish_non_exhaustive()
    }
}
