//! API Gateway Service
//!
//! Owns the node router and the listening socket.

use crate::domain::{GatewayConfig, GatewayError, GatewayResult};
use crate::routes::{build_router, AppState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP front of one node.
pub struct GatewayService {
    router: Router,
}

impl GatewayService {
    /// Validate `config` and build the router over `state`.
    pub fn new(state: AppState, config: &GatewayConfig) -> GatewayResult<Self> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        Ok(Self {
            router: build_router(state, config),
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the listening socket.
    ///
    /// Binding is split from serving so a caller can learn the socket is
    /// open before contacting peers that will call back.
    pub async fn bind(addr: SocketAddr) -> GatewayResult<TcpListener> {
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> GatewayResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener
            .local_addr()
            .map_err(|e| GatewayError::Server(e.to_string()))?;
        info!(addr = %local, "[qc-16] Serving node API");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;

        info!("[qc-16] Node API stopped");
        Ok(())
    }
}
