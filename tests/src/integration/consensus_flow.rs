//! # Consensus Flow
//!
//! Transaction spread and the three-phase round across a fully connected
//! network:
//!
//! 1. **Submit**: the entry node signs, pools and spreads the transaction
//! 2. **Preprepare**: the primary disseminates the candidate block
//! 3. **Prepare / Commit**: 2f matching votes per phase append the block
//!    everywhere and clear every pool

#[cfg(test)]
mod tests {
    use crate::network::InMemoryNetwork;
    use qc_01_peer_registry::PeerRegistryApi;
    use qc_02_ledger::{create_transaction, generate_transaction_id};
    use qc_08_consensus::{ConsensusApi, ConsensusConfig, Phase};
    use shared_crypto::NodeIdentity;
    use shared_types::{Amount, Digest, NodeAddress, PeerMessage, PhaseVote, PrePrepareMessage};
    use std::time::{Duration, Instant};

    const PORTS: [u16; 5] = [3001, 3002, 3003, 3004, 3005];

    fn addr(port: u16) -> NodeAddress {
        InMemoryNetwork::address(port)
    }

    // =============================================================================
    // END TO END
    // =============================================================================

    #[tokio::test]
    async fn test_five_nodes_commit_one_transaction() {
        let network = InMemoryNetwork::fully_connected(&PORTS).await;
        for node in network.nodes() {
            assert_eq!(node.registry.list_peers().len(), 4);
        }

        let entry = network.node(&addr(3001));
        let tx = entry
            .consensus
            .submit_transaction(addr(3002), 50.into())
            .await
            .unwrap();
        network.deliver_all().await;

        for node in network.nodes() {
            assert_eq!(
                node.consensus.status().pending_transactions,
                vec![tx.clone()],
                "pool of {}",
                node.address()
            );
        }

        let proposal = entry.consensus.propose_block().await.unwrap();
        network.deliver_all().await;

        let reference = entry.consensus.status().chain;
        assert_eq!(reference.len(), 2);
        assert_eq!(reference[1], proposal.block);
        assert_eq!(reference[1].transactions, vec![tx]);

        for node in network.nodes() {
            let status = node.consensus.status();
            assert_eq!(status.chain, reference, "chain of {}", node.address());
            assert!(status.pending_transactions.is_empty());
            assert!(status.chain_valid);
            assert_eq!(status.view, 2);
        }
    }

    #[tokio::test]
    async fn test_consecutive_rounds_with_different_primaries() {
        let network = InMemoryNetwork::fully_connected(&PORTS).await;

        for (round, primary) in [3001u16, 3003, 3005].into_iter().enumerate() {
            let node = network.node(&addr(primary));
            node.consensus
                .submit_transaction(addr(3002), (round as u64 + 1).into())
                .await
                .unwrap();
            network.deliver_all().await;
            node.consensus.propose_block().await.unwrap();
            network.deliver_all().await;
        }

        for node in network.nodes() {
            let status = node.consensus.status();
            assert_eq!(status.chain.len(), 4);
            assert_eq!(status.view, 4);
            assert!(status.chain_valid);
            let amounts: Vec<_> = status.chain[1..]
                .iter()
                .map(|block| block.transactions[0].amount.clone())
                .collect();
            assert_eq!(amounts, vec![Amount::from(1), Amount::from(2), Amount::from(3)]);
        }
    }

    #[tokio::test]
    async fn test_empty_block_commits() {
        let network = InMemoryNetwork::fully_connected(&PORTS[..4]).await;

        network
            .node(&addr(3002))
            .consensus
            .propose_block()
            .await
            .unwrap();
        network.deliver_all().await;

        for node in network.nodes() {
            let status = node.consensus.status();
            assert_eq!(status.chain.len(), 2);
            assert!(status.chain[1].transactions.is_empty());
        }
    }

    #[tokio::test]
    async fn test_round_commits_with_unreachable_peer() {
        let network = InMemoryNetwork::fully_connected(&PORTS).await;

        // Registered everywhere, but no node listens there.
        let ghost = addr(3999);
        for node in network.nodes() {
            assert!(node.registry.register_peer(ghost.clone(), &ghost));
            assert_eq!(node.registry.list_peers().len(), 5);
        }

        let entry = network.node(&addr(3002));
        entry
            .consensus
            .submit_transaction(addr(3004), Amount::from_f64(2.5).unwrap())
            .await
            .unwrap();
        network.deliver_all().await;
        entry.consensus.propose_block().await.unwrap();
        network.deliver_all().await;

        // Five peers: f = 2, so four matching votes are needed and the four
        // live peers supply them.
        for node in network.nodes() {
            let status = node.consensus.status();
            assert_eq!(status.chain.len(), 2, "chain of {}", node.address());
            assert!(status.pending_transactions.is_empty());
            assert!(status.chain_valid);
            assert_eq!(status.view, 2);
        }
    }

    // =============================================================================
    // INVALID PREPREPARE
    // =============================================================================

    #[tokio::test]
    async fn test_tampered_preprepare_rejected_without_votes() {
        let network = InMemoryNetwork::fully_connected(&PORTS[..4]).await;
        let primary = network.node(&addr(3001));
        primary
            .consensus
            .submit_transaction(addr(3003), 9.into())
            .await
            .unwrap();
        network.deliver_all().await;

        let mut block = primary
            .consensus
            .inspect(|state| state.ledger.build_candidate_block().unwrap());
        block.transactions[0].amount = 9_000.into();

        let target = network.node(&addr(3002));
        let result = target
            .consensus
            .on_preprepare(PrePrepareMessage {
                block,
                view: 1,
                primary: addr(3001),
            })
            .await;

        assert!(result.is_err());
        assert!(network.mailbox().pending().is_empty());
        target.consensus.inspect(|state| {
            assert_eq!(state.round.phase(), Phase::Idle);
            assert_eq!(state.round.prepare_count(), 1);
            assert_eq!(state.round.commit_count(), 1);
        });
        assert_eq!(target.consensus.status().chain.len(), 1);
    }

    #[tokio::test]
    async fn test_votes_for_unknown_digest_never_commit() {
        let network = InMemoryNetwork::fully_connected(&PORTS[..4]).await;
        let target = network.node(&addr(3004));

        for sender in [3001, 3002, 3003] {
            let vote = PhaseVote {
                digest: Digest::new("forged"),
                view: 1,
                primary: addr(3001),
                sender: addr(sender),
            };
            target.consensus.on_commit(vote).await;
        }

        assert_eq!(target.consensus.status().chain.len(), 1);
        assert!(network.mailbox().pending().is_empty());
    }

    // =============================================================================
    // TRANSACTION SPREAD
    // =============================================================================

    #[tokio::test]
    async fn test_forged_transaction_rejected_everywhere() {
        let network = InMemoryNetwork::fully_connected(&PORTS[..4]).await;

        // Signed by a key that is not the published key of the claimed sender.
        let impostor = NodeIdentity::generate(addr(3001));
        let id = generate_transaction_id();
        let signature = impostor.sign_transaction_payload(&addr(3004), &100.into(), &id);
        let forged = create_transaction(addr(3001), addr(3004), 100.into(), signature, id);

        for node in network.nodes().filter(|n| *n.address() != addr(3001)) {
            assert!(node.consensus.add_transaction(forged.clone()).await.is_err());
            assert!(node.consensus.status().pending_transactions.is_empty());
        }
    }

    #[tokio::test]
    async fn test_transaction_spread_is_one_hop() {
        let network = InMemoryNetwork::fully_connected(&PORTS[..4]).await;

        network
            .node(&addr(3002))
            .consensus
            .submit_transaction(addr(3001), 1.into())
            .await
            .unwrap();

        let pending = network.mailbox().pending();
        assert_eq!(pending.len(), 3);
        assert!(pending
            .iter()
            .all(|e| matches!(e.message, PeerMessage::AddTransaction(_))));

        // Receivers pool it without re-broadcasting.
        assert_eq!(network.deliver_all().await, 3);
    }

    // =============================================================================
    // ROUND TIMEOUT
    // =============================================================================

    #[tokio::test]
    async fn test_stalled_round_abandoned_after_timeout() {
        let config = ConsensusConfig::default().with_round_timeout(Duration::from_secs(10));
        let mut network = InMemoryNetwork::with_config(config);
        for port in &PORTS[..4] {
            network.add_node(*port);
        }
        for port in &PORTS[1..4] {
            network.join(&addr(3001), addr(*port)).await;
        }

        let primary = network.node(&addr(3001));
        primary.consensus.propose_block().await.unwrap();
        // Drop the preprepares: the round can never finish.
        assert_eq!(network.mailbox().clear(), 3);

        let later = Instant::now() + Duration::from_secs(11);
        assert!(primary.consensus.expire_stalled_round(later));
        primary
            .consensus
            .inspect(|state| assert_eq!(state.round.phase(), Phase::Idle));
        assert_eq!(primary.consensus.current_view(), 1);
    }
}
