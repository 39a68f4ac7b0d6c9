//! Gateway configuration with validation.

use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Upper bound on handling one inbound request
    pub request_timeout: Duration,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Timeout for one outbound call to a peer
    pub peer_timeout: Duration,
    /// Connect timeout for outbound calls to a peer
    pub peer_connect_timeout: Duration,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 2 * 1024 * 1024,
            peer_timeout: Duration::from_secs(5),
            peer_connect_timeout: Duration::from_secs(2),
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }
        if self.peer_timeout.is_zero() || self.peer_connect_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("peer timeouts cannot be 0".into()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit("max_body_bytes cannot be 0".into()));
        }
        Ok(())
    }
}

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}
