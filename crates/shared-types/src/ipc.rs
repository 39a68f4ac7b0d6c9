//! # Wire Schemas
//!
//! Request and response payloads for every node operation, plus the HTTP
//! routes they travel on.
//!
//! ## Design Rules
//!
//! - One explicit struct per payload, camelCase on the wire.
//! - Addresses are [`NodeAddress`] and therefore validated on deserialization.
//! - Responses always carry a human-readable `note`; fields that callers act
//!   on (`accepted`, `added`, `status`) are typed, never parsed out of notes.

use crate::entities::*;
use serde::{Deserialize, Serialize};

/// HTTP routes, relative to a node's base address.
pub mod routes {
    pub const STATUS: &str = "/";
    pub const PUBLIC_KEY: &str = "/identity/public-key";
    pub const SUBMIT_TRANSACTION: &str = "/transaction/broadcast";
    pub const ADD_TRANSACTION: &str = "/transaction/add";
    pub const JOIN_NETWORK: &str = "/connect";
    pub const REGISTER_PEER: &str = "/connect/register-peer";
    pub const REGISTER_ALL_PEERS: &str = "/connect/register-all";
    pub const PROPOSE_BLOCK: &str = "/block/propose";
    pub const PREPREPARE: &str = "/consensus/preprepare";
    pub const PREPARE: &str = "/consensus/prepare";
    pub const COMMIT: &str = "/consensus/commit";
}

// =============================================================================
// GENERIC
// =============================================================================

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub note: String,
}

impl Ack {
    pub fn new(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Response to GetPublicKey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    /// Address of the answering node.
    pub source: NodeAddress,
    /// Hex of the compressed SEC1 public key.
    pub public_key: String,
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Client request asking a node to create, sign and spread a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionRequest {
    pub recipient: NodeAddress,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionResponse {
    pub note: String,
    pub transaction: Transaction,
}

/// Response to AddTransaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionResponse {
    pub note: String,
    pub accepted: bool,
}

// =============================================================================
// PEER REGISTRY
// =============================================================================

/// Client request asking a node to bring a new node into the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinNetworkRequest {
    pub new_node_address: NodeAddress,
}

/// Relayed by the joining node's entry point to its existing peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPeerRequest {
    pub new_node_address: NodeAddress,
    pub source: NodeAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPeerResponse {
    pub note: String,
    pub current_node_address: NodeAddress,
}

/// Sent to a newly joined node: the entry point plus all of its peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAllPeersRequest {
    pub peer_addresses: Vec<NodeAddress>,
    pub source: NodeAddress,
}

// =============================================================================
// CONSENSUS
// =============================================================================

/// Candidate block disseminated by the primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrePrepareMessage {
    pub block: Block,
    pub view: u64,
    pub primary: NodeAddress,
}

/// A Prepare or Commit vote. Both phases share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseVote {
    pub digest: Digest,
    pub view: u64,
    pub primary: NodeAddress,
    /// Self-reported voter address.
    pub sender: NodeAddress,
}

/// Outcome flag of a Preprepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseStatus {
    Success,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrePrepareResponse {
    pub note: String,
    pub status: PhaseStatus,
    /// Echo of the rejected block, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub note: String,
    pub added: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeBlockResponse {
    pub note: String,
    pub block: Block,
    pub view: u64,
}

// =============================================================================
// PEER-TO-PEER ENVELOPE
// =============================================================================

/// Every message one node pushes to another.
///
/// Outbound adapters post the inner payload to [`PeerMessage::route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerMessage {
    AddTransaction(Transaction),
    RegisterPeer(RegisterPeerRequest),
    RegisterAllPeers(RegisterAllPeersRequest),
    PrePrepare(PrePrepareMessage),
    Prepare(PhaseVote),
    Commit(PhaseVote),
}

impl PeerMessage {
    /// Route the payload is posted to.
    pub fn route(&self) -> &'static str {
        match self {
            PeerMessage::AddTransaction(_) => routes::ADD_TRANSACTION,
            PeerMessage::RegisterPeer(_) => routes::REGISTER_PEER,
            PeerMessage::RegisterAllPeers(_) => routes::REGISTER_ALL_PEERS,
            PeerMessage::PrePrepare(_) => routes::PREPREPARE,
            PeerMessage::Prepare(_) => routes::PREPARE,
            PeerMessage::Commit(_) => routes::COMMIT,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::AddTransaction(_) => "add_transaction",
            PeerMessage::RegisterPeer(_) => "register_peer",
            PeerMessage::RegisterAllPeers(_) => "register_all_peers",
            PeerMessage::PrePrepare(_) => "preprepare",
            PeerMessage::Prepare(_) => "prepare",
            PeerMessage::Commit(_) => "commit",
        }
    }

    /// JSON body of the message.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            PeerMessage::AddTransaction(m) => serde_json::to_value(m),
            PeerMessage::RegisterPeer(m) => serde_json::to_value(m),
            PeerMessage::RegisterAllPeers(m) => serde_json::to_value(m),
            PeerMessage::PrePrepare(m) => serde_json::to_value(m),
            PeerMessage::Prepare(m) | PeerMessage::Commit(m) => serde_json::to_value(m),
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Snapshot of a node for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub address: NodeAddress,
    pub public_key: String,
    pub view: u64,
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
    pub peers: Vec<NodeAddress>,
    pub chain_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub note: String,
    pub status: NodeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> NodeAddress {
        NodeAddress::parse(s).unwrap()
    }

    #[test]
    fn test_phase_status_wire_format() {
        assert_eq!(serde_json::to_string(&PhaseStatus::Success).unwrap(), "\"SUCCESS\"");
        assert_eq!(serde_json::to_string(&PhaseStatus::Fail).unwrap(), "\"FAIL\"");
    }

    #[test]
    fn test_vote_is_camel_case() {
        let vote = PhaseVote {
            digest: Digest::new("ab"),
            view: 3,
            primary: addr("http://p:1"),
            sender: addr("http://s:2"),
        };
        let value = serde_json::to_value(&vote).unwrap();
        assert_eq!(value["digest"], "ab");
        assert_eq!(value["view"], 3);
        assert_eq!(value["primary"], "http://p:1");
    }

    #[test]
    fn test_join_request_rejects_bad_address() {
        let bad = serde_json::from_str::<JoinNetworkRequest>(r#"{"newNodeAddress":"nope"}"#);
        assert!(bad.is_err());
        let good =
            serde_json::from_str::<JoinNetworkRequest>(r#"{"newNodeAddress":"http://n:7/"}"#)
                .unwrap();
        assert_eq!(good.new_node_address.as_str(), "http://n:7");
    }

    #[test]
    fn test_peer_message_routes() {
        let vote = PhaseVote {
            digest: Digest::new("ab"),
            view: 1,
            primary: addr("http://p:1"),
            sender: addr("http://s:2"),
        };
        assert_eq!(PeerMessage::Prepare(vote.clone()).route(), routes::PREPARE);
        assert_eq!(PeerMessage::Commit(vote).route(), routes::COMMIT);
    }

    #[test]
    fn test_preprepare_response_omits_block_on_success() {
        let ok = PrePrepareResponse {
            note: "Received Block".into(),
            status: PhaseStatus::Success,
            block: None,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("block").is_none());
    }
}
