//! # Peer Join
//!
//! Join propagation over the in-memory network:
//!
//! 1. **Relay**: the entry point tells its existing peers about the new node
//! 2. **Hand-over**: the new node receives the entry point plus its peers
//! 3. **Mesh**: any sequence of joins through members ends fully connected

#[cfg(test)]
mod tests {
    use crate::network::InMemoryNetwork;
    use qc_01_peer_registry::{PeerRegistryApi, PeerRegistryError};
    use shared_types::NodeAddress;

    fn addr(port: u16) -> NodeAddress {
        InMemoryNetwork::address(port)
    }

    fn assert_full_mesh(network: &InMemoryNetwork, ports: &[u16]) {
        for node in network.nodes() {
            let mut expected: Vec<_> = ports
                .iter()
                .map(|p| addr(*p))
                .filter(|a| a != node.address())
                .collect();
            expected.sort();
            let mut peers = node.registry.list_peers();
            peers.sort();
            assert_eq!(peers, expected, "peers of {}", node.address());
        }
    }

    #[tokio::test]
    async fn test_join_through_single_entry_point() {
        let network = InMemoryNetwork::fully_connected(&[3001, 3002, 3003, 3004]).await;
        assert_full_mesh(&network, &[3001, 3002, 3003, 3004]);
    }

    #[tokio::test]
    async fn test_chained_joins_reach_full_mesh() {
        let mut network = InMemoryNetwork::new();
        for port in [3001, 3002, 3003, 3004] {
            network.add_node(port);
        }

        // Each node joins through the previous newcomer.
        network.join(&addr(3001), addr(3002)).await;
        network.join(&addr(3002), addr(3003)).await;
        network.join(&addr(3003), addr(3004)).await;

        assert_full_mesh(&network, &[3001, 3002, 3003, 3004]);
    }

    #[tokio::test]
    async fn test_rejoin_is_idempotent() {
        let network = InMemoryNetwork::fully_connected(&[3001, 3002, 3003]).await;

        network.join(&addr(3001), addr(3003)).await;
        network.join(&addr(3002), addr(3003)).await;

        assert_full_mesh(&network, &[3001, 3002, 3003]);
    }

    #[tokio::test]
    async fn test_join_of_missing_node_keeps_registration() {
        let mut network = InMemoryNetwork::new();
        network.add_node(3001);

        let result = network
            .node(&addr(3001))
            .registry
            .join_network(addr(3999))
            .await;

        assert!(matches!(result, Err(PeerRegistryError::Unreachable { .. })));
        assert_eq!(network.node(&addr(3001)).registry.list_peers(), vec![addr(3999)]);
        assert_eq!(network.deliver_all().await, 0);
    }

    #[tokio::test]
    async fn test_peer_count_drives_quorum() {
        use qc_08_consensus::{quorum_threshold, ConsensusApi};

        let network = InMemoryNetwork::fully_connected(&[3001, 3002, 3003, 3004, 3005, 3006, 3007]).await;

        for node in network.nodes() {
            let peers = node.consensus.status().peers.len();
            assert_eq!(peers, 6);
            assert_eq!(quorum_threshold(peers), 4);
        }
    }
}
