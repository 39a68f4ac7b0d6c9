//! HTTP routes and handlers.
//!
//! Every handler parses its body into the explicit schema from
//! `shared_types::ipc`, calls one inbound port and maps the outcome to a
//! JSON ack. Malformed bodies never reach the ports: [`ApiJson`] turns the
//! extractor rejection into a 400.

use crate::domain::{ApiError, GatewayConfig};
use axum::extract::{DefaultBodyLimit, FromRequest, State};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use qc_01_peer_registry::{PeerRegistryApi, PeerRegistryError};
use qc_08_consensus::{ConsensusApi, ConsensusError, VoteOutcome};
use shared_crypto::NodeIdentity;
use shared_types::{
    routes, Ack, AddTransactionResponse, CommitResponse, JoinNetworkRequest, PhaseStatus,
    PhaseVote, PrePrepareMessage, PrePrepareResponse, ProposeBlockResponse, PublicKeyResponse,
    RegisterAllPeersRequest, RegisterPeerRequest, RegisterPeerResponse, StatusResponse,
    SubmitTransactionRequest, SubmitTransactionResponse, Transaction,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};


/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub consensus: Arc<dyn ConsensusApi>,
    pub registry: Arc<dyn PeerRegistryApi>,
    pub identity: Arc<NodeIdentity>,
}

/// JSON body extractor answering malformed input with [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Build the node router with its middleware stack.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(config))
        .layer(TimeoutLayer::new(config.request_timeout));

    let router = Router::new()
        .route(routes::STATUS, get(status))
        .route(routes::PUBLIC_KEY, get(public_key))
        .route(routes::SUBMIT_TRANSACTION, post(submit_transaction))
        .route(routes::ADD_TRANSACTION, post(add_transaction))
        .route(routes::JOIN_NETWORK, post(join_network))
        .route(routes::REGISTER_PEER, post(register_peer))
        .route(routes::REGISTER_ALL_PEERS, post(register_all_peers))
        .route(routes::PROPOSE_BLOCK, post(propose_block))
        .route(routes::PREPREPARE, post(preprepare))
        .route(routes::PREPARE, post(prepare))
        .route(routes::COMMIT, post(commit));

    #[cfg(feature = "metrics")]
    let router = router.route("/metrics", get(metrics));

    router
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}

fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::new();
    }
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

// =============================================================================
// STATUS & IDENTITY
// =============================================================================

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        note: "Node status".to_string(),
        status: state.consensus.status(),
    })
}

async fn public_key(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        source: state.identity.address().clone(),
        public_key: state.identity.export_public_key().to_string(),
    })
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

async fn submit_transaction(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SubmitTransactionRequest>,
) -> Result<Json<SubmitTransactionResponse>, ApiError> {
    let transaction = state
        .consensus
        .submit_transaction(request.recipient, request.amount)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(SubmitTransactionResponse {
        note: "Transaction created and broadcast successfully.".to_string(),
        transaction,
    }))
}

async fn add_transaction(
    State(state): State<AppState>,
    ApiJson(transaction): ApiJson<Transaction>,
) -> Json<AddTransactionResponse> {
    let response = match state.consensus.add_transaction(transaction).await {
        Ok(()) => AddTransactionResponse {
            note: "Transaction added to pending pool.".to_string(),
            accepted: true,
        },
        Err(e @ ConsensusError::InvalidSignature { .. }) => AddTransactionResponse {
            note: format!("Transaction rejected: {}", e),
            accepted: false,
        },
        Err(e) => AddTransactionResponse {
            note: format!("Transaction not added: {}", e),
            accepted: false,
        },
    };
    Json(response)
}

// =============================================================================
// PEER REGISTRY
// =============================================================================

async fn join_network(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JoinNetworkRequest>,
) -> Result<Json<Ack>, ApiError> {
    let new_node = request.new_node_address;
    if new_node == state.registry.local_address() {
        return Err(ApiError::bad_request("A node cannot join through itself"));
    }

    let note = match state.registry.join_network(new_node).await {
        Ok(outcome) => {
            info!(
                relayed = outcome.relayed_to.len(),
                handed_over = outcome.handed_over.len(),
                "[qc-16] JoinNetwork handled"
            );
            "New node registered with network successfully.".to_string()
        }
        Err(PeerRegistryError::Unreachable { peer, reason }) => {
            warn!(peer = %peer, reason = %reason, "[qc-16] JoinNetwork hand-over failed");
            format!(
                "New node registered, but the peer list could not be delivered to {}: {}",
                peer, reason
            )
        }
    };
    Ok(Json(Ack::new(note)))
}

async fn register_peer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterPeerRequest>,
) -> Json<RegisterPeerResponse> {
    let added = state
        .registry
        .register_peer(request.new_node_address, &request.source);
    let note = if added {
        "New node registered successfully."
    } else {
        "Node already registered."
    };
    Json(RegisterPeerResponse {
        note: note.to_string(),
        current_node_address: state.registry.local_address(),
    })
}

async fn register_all_peers(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterAllPeersRequest>,
) -> Json<Ack> {
    let added = state
        .registry
        .register_all_peers(request.peer_addresses, &request.source);
    Json(Ack::new(format!(
        "Bulk registration successful ({} new).",
        added
    )))
}

// =============================================================================
// CONSENSUS
// =============================================================================

async fn propose_block(
    State(state): State<AppState>,
) -> Result<Json<ProposeBlockResponse>, ApiError> {
    let proposal = state
        .consensus
        .propose_block()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(ProposeBlockResponse {
        note: "Block broadcasted successfully.".to_string(),
        block: proposal.block,
        view: proposal.view,
    }))
}

async fn preprepare(
    State(state): State<AppState>,
    ApiJson(message): ApiJson<PrePrepareMessage>,
) -> Json<PrePrepareResponse> {
    let block = message.block.clone();
    let response = match state.consensus.on_preprepare(message).await {
        Ok(_) => PrePrepareResponse {
            note: "Received Block".to_string(),
            status: PhaseStatus::Success,
            block: None,
        },
        Err(_) => PrePrepareResponse {
            note: "This block is invalid".to_string(),
            status: PhaseStatus::Fail,
            block: Some(block),
        },
    };
    Json(response)
}

async fn prepare(
    State(state): State<AppState>,
    ApiJson(vote): ApiJson<PhaseVote>,
) -> Json<Ack> {
    let note = match state.consensus.on_prepare(vote).await {
        VoteOutcome::Stale => "Stale prepare ignored.".to_string(),
        VoteOutcome::Duplicate => "Duplicate prepare ignored.".to_string(),
        VoteOutcome::Counted { count, threshold } => {
            format!("Prepare counted ({}/{}).", count, threshold)
        }
        VoteOutcome::QuorumReached { count, threshold } => {
            format!("Prepare quorum reached ({}/{}), commit broadcast.", count, threshold)
        }
    };
    Json(Ack::new(note))
}

async fn commit(
    State(state): State<AppState>,
    ApiJson(vote): ApiJson<PhaseVote>,
) -> Json<CommitResponse> {
    let added = state.consensus.on_commit(vote).await.reached_quorum();
    let note = if added {
        "Block Added Successfully"
    } else {
        "Block Not Added"
    };
    Json(CommitResponse {
        note: note.to_string(),
        added,
    })
}

#[cfg(feature = "metrics")]
async fn metrics() -> Result<String, ApiError> {
    use prometheus::Encoder;

    let mut buffer = Vec::new();
    prometheus::TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| ApiError::internal(e.to_string()))
}
