//! # Peer Registry Subsystem
//!
//! **Subsystem ID:** 1
//!
//! Keeps the set of peer addresses a node broadcasts to, and runs the
//! join protocol that makes registration mutual without a global directory.
//!
//! ## Architecture
//!
//! - **Domain Layer:** [`PeerRegistry`], an ordered set of distinct addresses
//!   that never contains the local node.
//! - **Ports Layer:** [`PeerRegistryApi`] (driving) and [`PeerNotifier`]
//!   (driven, implemented by the HTTP gateway).
//! - **Service Layer:** [`PeerRegistryService`] wires the domain to the ports.
//!
//! ## Join protocol
//!
//! ```text
//!  client ──JoinNetwork{N}──→ A
//!                             │ RegisterPeer{N, source=A} ──→ every peer of A
//!                             │ register N locally
//!                             └ RegisterAllPeers{[A, ..A.peers]} ──→ N
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qc_01_peer_registry::PeerRegistry;
//! use shared_types::NodeAddress;
//!
//! let me = NodeAddress::parse("http://localhost:3001").unwrap();
//! let mut registry = PeerRegistry::new(me.clone());
//!
//! assert!(registry.add_peer(NodeAddress::parse("http://localhost:3002").unwrap()));
//! assert!(!registry.add_peer(me));
//! assert_eq!(registry.len(), 1);
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{shared_registry, PeerRegistry, PeerRegistryError, SharedPeerRegistry};
pub use ports::{JoinOutcome, PeerNotifier, PeerRegistryApi};
pub use service::PeerRegistryService;
