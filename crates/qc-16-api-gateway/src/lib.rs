//! # qc-16-api-gateway
//!
//! HTTP face of a Quorum-Chain node.
//!
//! ## Architecture
//!
//! ```text
//!   clients / peers
//!         │ JSON over HTTP
//!   ┌─────┴──────────────────────────────┐
//!   │ Trace → CORS → Timeout → BodyLimit │
//!   └─────┬──────────────────────────────┘
//!         │ routes::*  (ApiJson rejects malformed bodies with 400)
//!   ┌─────┴─────────┐     ┌──────────────────┐
//!   │ ConsensusApi  │     │ PeerRegistryApi  │
//!   └─────┬─────────┘     └────────┬─────────┘
//!         └───── HttpPeerClient ───┘  fire-and-forget fan-out
//! ```
//!
//! Inbound routes are listed in [`shared_types::routes`]. Outbound traffic
//! goes through [`HttpPeerClient`], which implements every driven port the
//! consensus and registry subsystems declare.
//!
//! ## Usage
//!
//! ```ignore
//! use qc_16_api_gateway::{AppState, GatewayConfig, GatewayService};
//!
//! let service = GatewayService::new(state, &GatewayConfig::default())?;
//! let listener = GatewayService::bind("0.0.0.0:3001".parse()?).await?;
//! service.serve(listener, shutdown_signal).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod routes;
pub mod service;

pub use adapters::HttpPeerClient;
pub use domain::{ApiError, ConfigError, CorsConfig, GatewayConfig, GatewayError, GatewayResult};
pub use routes::{build_router, ApiJson, AppState};
pub use service::GatewayService;
