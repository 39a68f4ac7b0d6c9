//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: [`Block`], [`Transaction`], [`Digest`]
//! - **Networking**: [`NodeAddress`]

use crate::errors::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Transfer amount: any JSON number, fractional or negative included.
///
/// Its decimal rendering is what gets signed and hashed, and that rendering
/// is the same on every node.
pub type Amount = serde_json::Number;

/// Digest of the genesis block, and the `previousHash` it carries.
pub const GENESIS_DIGEST: &str = "0";

/// Block id of the genesis block.
pub const GENESIS_BLOCK_ID: u64 = 1;

/// Lowercase hex SHA-256 digest identifying a block's content.
///
/// The genesis block uses the literal `"0"`, so this is a string newtype
/// rather than a fixed-size array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wrap an already computed digest.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The fixed genesis digest.
    pub fn genesis() -> Self {
        Self(GENESIS_DIGEST.to_string())
    }

    /// True for the "no digest adopted" placeholder used between rounds.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(12) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed data entry waiting for, or included in, a block.
///
/// Field order is part of the block digest: the canonical JSON rendering
/// serializes fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique token (32 lowercase hex chars).
    pub transaction_id: String,
    /// Address of the node that signed this entry.
    pub sender: NodeAddress,
    /// Address of the receiving node.
    pub recipient: NodeAddress,
    /// Transferred amount.
    pub amount: Amount,
    /// Hex r||s secp256k1 signature over [`Transaction::signing_payload`].
    pub signature: String,
}

impl Transaction {
    /// Canonical bytes covered by the sender's signature.
    ///
    /// Plain concatenation of `sender`, `recipient`, decimal `amount` and
    /// `transactionId`.
    pub fn signing_payload(&self) -> Vec<u8> {
        signing_payload(&self.sender, &self.recipient, &self.amount, &self.transaction_id)
    }
}

/// Build the canonical signing payload before a [`Transaction`] exists.
pub fn signing_payload(
    sender: &NodeAddress,
    recipient: &NodeAddress,
    amount: &Amount,
    transaction_id: &str,
) -> Vec<u8> {
    format!("{}{}{}{}", sender, recipient, amount, transaction_id).into_bytes()
}

/// A hash-linked block of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain, starting at 1 for genesis.
    pub block_id: u64,
    /// Transactions in inclusion order.
    pub transactions: Vec<Transaction>,
    /// Digest of the previous block, `"0"` for genesis.
    pub previous_hash: Digest,
    /// Digest of `(block_id, previous_hash, transactions)`.
    pub hash: Digest,
}

impl Block {
    /// The fixed genesis block, identical on every node by construction.
    pub fn genesis() -> Self {
        Self {
            block_id: GENESIS_BLOCK_ID,
            transactions: Vec::new(),
            previous_hash: Digest::genesis(),
            hash: Digest::genesis(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        *self == Self::genesis()
    }
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Base URL of a node, e.g. `http://localhost:3001`.
///
/// Parsed on deserialization, so a malformed address never reaches the
/// registry or the consensus state machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeAddress(String);

impl NodeAddress {
    /// Parse and normalize a node address.
    ///
    /// Rules: non-empty, no whitespace, `http://` or `https://` scheme with a
    /// non-empty host part. A trailing `/` is trimmed so that
    /// `http://a:1/` and `http://a:1` are the same peer.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.is_empty() {
            return Err(AddressError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(AddressError::Whitespace(raw.to_string()));
        }
        let (scheme, rest) = ["http://", "https://"]
            .iter()
            .find_map(|scheme| raw.strip_prefix(scheme).map(|rest| (*scheme, rest)))
            .ok_or_else(|| AddressError::UnsupportedScheme(raw.to_string()))?;
        let host = rest.trim_end_matches('/');
        if host.is_empty() {
            return Err(AddressError::MissingHost(raw.to_string()));
        }
        Ok(Self(format!("{}{}", scheme, host)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a route path onto this base address.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl TryFrom<String> for NodeAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodeAddress> for String {
    fn from(value: NodeAddress) -> Self {
        value.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
