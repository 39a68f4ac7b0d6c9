//! # In-Memory Network
//!
//! Runs several nodes in one process with the real consensus and registry
//! services. Outbound ports enqueue into one shared FIFO mailbox instead of
//! sending HTTP; [`InMemoryNetwork::deliver_all`] drains it, dispatching
//! each message to the target node's inbound API, until no traffic is left.
//!
//! Delivery order is the order messages were sent, so every run of a
//! scenario is identical.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use qc_01_peer_registry::{
    shared_registry, PeerNotifier, PeerRegistryApi, PeerRegistryError, PeerRegistryService,
};
use qc_08_consensus::{
    ConsensusApi, ConsensusConfig, ConsensusDependencies, ConsensusService, PeerBroadcaster,
    PublicKeyDirectory,
};
use shared_crypto::NodeIdentity;
use shared_types::{NodeAddress, PeerMessage};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Upper bound on deliveries per drain; a protocol loop would hit it.
const MAX_DELIVERIES: usize = 100_000;

/// A message in flight.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub to: NodeAddress,
    pub message: PeerMessage,
}

/// Shared FIFO plus the public key directory of every node on the network.
#[derive(Default)]
pub struct Mailbox {
    queue: Mutex<VecDeque<Envelope>>,
    keys: RwLock<HashMap<NodeAddress, String>>,
}

impl Mailbox {
    fn post(&self, to: &NodeAddress, message: PeerMessage) {
        self.queue.lock().push_back(Envelope {
            to: to.clone(),
            message,
        });
    }

    fn next(&self) -> Option<Envelope> {
        self.queue.lock().pop_front()
    }

    /// Drop everything in flight, as a partition would. Returns the count.
    pub fn clear(&self) -> usize {
        let mut queue = self.queue.lock();
        let dropped = queue.len();
        queue.clear();
        dropped
    }

    /// Messages waiting for delivery.
    pub fn pending(&self) -> Vec<Envelope> {
        self.queue.lock().iter().cloned().collect()
    }
}

/// Outbound port of one node, backed by the shared mailbox.
#[derive(Clone)]
pub struct MailboxPort {
    mailbox: Arc<Mailbox>,
}

#[async_trait]
impl PeerBroadcaster for MailboxPort {
    async fn broadcast(&self, peers: &[NodeAddress], message: PeerMessage) {
        for peer in peers {
            self.mailbox.post(peer, message.clone());
        }
    }
}

#[async_trait]
impl PeerNotifier for MailboxPort {
    async fn notify_all(&self, peers: &[NodeAddress], message: PeerMessage) {
        for peer in peers {
            self.mailbox.post(peer, message.clone());
        }
    }

    async fn notify(&self, peer: &NodeAddress, message: PeerMessage) -> Result<(), PeerRegistryError> {
        if !self.mailbox.keys.read().contains_key(peer) {
            return Err(PeerRegistryError::Unreachable {
                peer: peer.clone(),
                reason: "no such node".to_string(),
            });
        }
        self.mailbox.post(peer, message);
        Ok(())
    }
}

#[async_trait]
impl PublicKeyDirectory for MailboxPort {
    async fn fetch_public_key(&self, node: &NodeAddress) -> Result<String, String> {
        self.mailbox
            .keys
            .read()
            .get(node)
            .cloned()
            .ok_or_else(|| "connection refused".to_string())
    }
}

/// Consensus service wired to the mailbox.
pub type SimConsensus = ConsensusService<MailboxPort, MailboxPort>;

/// Registry service wired to the mailbox.
pub type SimRegistry = PeerRegistryService<MailboxPort>;

/// One node of the in-memory network.
pub struct SimNode {
    pub identity: Arc<NodeIdentity>,
    pub consensus: Arc<SimConsensus>,
    pub registry: Arc<SimRegistry>,
}

impl SimNode {
    pub fn address(&self) -> &NodeAddress {
        self.identity.address()
    }

    async fn receive(&self, message: PeerMessage) {
        match message {
            PeerMessage::AddTransaction(tx) => {
                let _ = self.consensus.add_transaction(tx).await;
            }
            PeerMessage::RegisterPeer(req) => {
                self.registry.register_peer(req.new_node_address, &req.source);
            }
            PeerMessage::RegisterAllPeers(req) => {
                self.registry.register_all_peers(req.peer_addresses, &req.source);
            }
            PeerMessage::PrePrepare(m) => {
                let _ = self.consensus.on_preprepare(m).await;
            }
            PeerMessage::Prepare(vote) => {
                self.consensus.on_prepare(vote).await;
            }
            PeerMessage::Commit(vote) => {
                self.consensus.on_commit(vote).await;
            }
        }
    }
}

/// Several nodes sharing one mailbox.
#[derive(Default)]
pub struct InMemoryNetwork {
    mailbox: Arc<Mailbox>,
    nodes: BTreeMap<NodeAddress, SimNode>,
    config: ConsensusConfig,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConsensusConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Address used for the node on `port`.
    pub fn address(port: u16) -> NodeAddress {
        NodeAddress::parse(&format!("http://localhost:{}", port))
            .unwrap_or_else(|e| panic!("bad test address: {}", e))
    }

    /// Start a node on `port` with no peers.
    pub fn add_node(&mut self, port: u16) -> NodeAddress {
        let address = Self::address(port);
        let identity = Arc::new(NodeIdentity::generate(address.clone()));
        let port_impl = Arc::new(MailboxPort {
            mailbox: Arc::clone(&self.mailbox),
        });
        let peers = shared_registry(address.clone());

        let consensus = Arc::new(ConsensusService::new(ConsensusDependencies {
            broadcaster: Arc::clone(&port_impl),
            key_directory: Arc::clone(&port_impl),
            identity: Arc::clone(&identity),
            peers: Arc::clone(&peers),
            config: self.config.clone(),
        }));
        let registry = Arc::new(PeerRegistryService::new(peers, port_impl));

        self.mailbox.keys.write().insert(
            address.clone(),
            identity.export_public_key().to_string(),
        );
        self.nodes.insert(
            address.clone(),
            SimNode {
                identity,
                consensus,
                registry,
            },
        );
        address
    }

    /// Start nodes on `ports` and join each through the first one.
    pub async fn fully_connected(ports: &[u16]) -> Self {
        let mut network = Self::new();
        let addresses: Vec<_> = ports.iter().map(|port| network.add_node(*port)).collect();
        if let Some((entry, rest)) = addresses.split_first() {
            for address in rest {
                network.join(entry, address.clone()).await;
            }
        }
        network
    }

    /// Join `new_node` through `entry` and deliver the resulting traffic.
    pub async fn join(&self, entry: &NodeAddress, new_node: NodeAddress) {
        let _ = self.node(entry).registry.join_network(new_node).await;
        self.deliver_all().await;
    }

    pub fn node(&self, address: &NodeAddress) -> &SimNode {
        self.nodes
            .get(address)
            .unwrap_or_else(|| panic!("no node at {}", address))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SimNode> {
        self.nodes.values()
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Deliver queued messages, including the ones deliveries produce, until
    /// the mailbox is empty. Returns the number delivered.
    ///
    /// Messages addressed to unknown nodes are dropped.
    pub async fn deliver_all(&self) -> usize {
        let mut delivered = 0;
        while let Some(envelope) = self.mailbox.next() {
            assert!(delivered < MAX_DELIVERIES, "network never went quiet");
            match self.nodes.get(&envelope.to) {
                Some(node) => {
                    debug!(to = %envelope.to, kind = envelope.message.kind(), "[sim] deliver");
                    node.receive(envelope.message).await;
                    delivered += 1;
                }
                None => debug!(to = %envelope.to, "[sim] dropped, no such node"),
            }
        }
        delivered
    }
}
