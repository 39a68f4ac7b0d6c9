//! Outbound HTTP client for peer traffic.
//!
//! One client serves every outbound port: protocol fan-out, join hand-over
//! and public key lookup. Fan-out spawns one task per peer and returns at
//! once; a peer that cannot be reached is logged and never retried.

use crate::domain::{GatewayConfig, GatewayError, GatewayResult};
use async_trait::async_trait;
use qc_01_peer_registry::{PeerNotifier, PeerRegistryError};
use qc_08_consensus::{PeerBroadcaster, PublicKeyDirectory};
use qc_telemetry::log_peer_event;
use reqwest::Client;
use shared_types::{routes, Ack, JoinNetworkRequest, NodeAddress, PeerMessage, PublicKeyResponse};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// reqwest-backed implementation of the peer-facing ports.
#[derive(Clone)]
pub struct HttpPeerClient {
    client: Client,
}

impl HttpPeerClient {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.peer_timeout)
            .connect_timeout(config.peer_connect_timeout)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// POST `message` to its route on `peer` and require a 2xx answer.
    pub async fn send(&self, peer: &NodeAddress, message: &PeerMessage) -> Result<(), String> {
        let body = message.to_json().map_err(|e| e.to_string())?;
        self.client
            .post(peer.join(message.route()))
            .json(&body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(describe)?;
        Ok(())
    }

    /// Deliver `message` to every peer concurrently.
    ///
    /// The handles are only useful to callers that want to wait; the ports
    /// drop them.
    pub fn spawn_fan_out(&self, peers: &[NodeAddress], message: PeerMessage) -> Vec<JoinHandle<()>> {
        let message = Arc::new(message);
        peers
            .iter()
            .cloned()
            .map(|peer| {
                let client = self.clone();
                let message = Arc::clone(&message);
                tokio::spawn(async move {
                    if let Err(reason) = client.send(&peer, &message).await {
                        log_peer_event!(
                            warn,
                            "qc-16",
                            "Unreachable peer",
                            peer,
                            kind = message.kind(),
                            reason = %reason
                        );
                    }
                })
            })
            .collect()
    }

    /// Ask `bootstrap` to join `new_node` into its network.
    pub async fn request_join(
        &self,
        bootstrap: &NodeAddress,
        new_node: &NodeAddress,
    ) -> GatewayResult<Ack> {
        let request = JoinNetworkRequest {
            new_node_address: new_node.clone(),
        };
        let response = self
            .client
            .post(bootstrap.join(routes::JOIN_NETWORK))
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| GatewayError::Client(describe(e)))?;
        response
            .json::<Ack>()
            .await
            .map_err(|e| GatewayError::Client(describe(e)))
    }
}

fn describe(error: reqwest::Error) -> String {
    if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_timeout() {
        "timed out".to_string()
    } else {
        error.to_string()
    }
}

#[async_trait]
impl PeerBroadcaster for HttpPeerClient {
    async fn broadcast(&self, peers: &[NodeAddress], message: PeerMessage) {
        self.spawn_fan_out(peers, message);
    }
}

#[async_trait]
impl PeerNotifier for HttpPeerClient {
    async fn notify_all(&self, peers: &[NodeAddress], message: PeerMessage) {
        self.spawn_fan_out(peers, message);
    }

    async fn notify(&self, peer: &NodeAddress, message: PeerMessage) -> Result<(), PeerRegistryError> {
        self.send(peer, &message)
            .await
            .map_err(|reason| PeerRegistryError::Unreachable {
                peer: peer.clone(),
                reason,
            })
    }
}

#[async_trait]
impl PublicKeyDirectory for HttpPeerClient {
    async fn fetch_public_key(&self, node: &NodeAddress) -> Result<String, String> {
        let response = self
            .client
            .get(node.join(routes::PUBLIC_KEY))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(describe)?;
        let body: PublicKeyResponse = response.json().await.map_err(describe)?;
        Ok(body.public_key)
    }
}
