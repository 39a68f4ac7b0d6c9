//! # Node Configuration
//!
//! Unified configuration for the node: listening socket, advertised address,
//! consensus timing and the HTTP gateway.
//!
//! Precedence, lowest first: defaults, `QC_*` environment variables, CLI
//! flags (applied by the binary on top of [`NodeConfig::from_env`]).

use qc_08_consensus::ConsensusConfig;
use qc_16_api_gateway::GatewayConfig;
use shared_types::NodeAddress;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Environment variable names.
pub mod env {
    pub const HOST: &str = "QC_HOST";
    pub const PORT: &str = "QC_PORT";
    pub const PUBLIC_ADDRESS: &str = "QC_PUBLIC_ADDRESS";
    pub const ROUND_TIMEOUT_SECS: &str = "QC_ROUND_TIMEOUT_SECS";
    pub const BOOTSTRAP_PEER: &str = "QC_BOOTSTRAP_PEER";
}

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Network configuration.
    pub network: NetworkConfig,
    /// Consensus configuration.
    pub consensus: ConsensusConfig,
    /// API Gateway configuration.
    pub gateway: GatewayConfig,
}

/// Network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Interface the gateway binds to.
    pub host: IpAddr,
    /// Gateway listening port.
    pub port: u16,
    /// Address peers use to reach this node. Derived from the port when unset.
    pub public_address: Option<NodeAddress>,
    /// Existing node to join through at startup.
    pub bootstrap_peer: Option<NodeAddress>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            public_address: None,
            bootstrap_peer: None,
        }
    }
}

impl NetworkConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Advertised address, `http://localhost:<port>` unless configured.
    pub fn public_address(&self) -> Result<NodeAddress, ConfigError> {
        match &self.public_address {
            Some(address) => Ok(address.clone()),
            None => parse_address(
                env::PUBLIC_ADDRESS,
                &format!("http://localhost:{}", self.port),
            ),
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(env::HOST) {
            config.network.host = parse_value(env::HOST, &host)?;
        }
        if let Some(port) = lookup(env::PORT) {
            config.network.port = parse_value(env::PORT, &port)?;
        }
        if let Some(address) = lookup(env::PUBLIC_ADDRESS) {
            config.network.public_address = Some(parse_address(env::PUBLIC_ADDRESS, &address)?);
        }
        if let Some(peer) = lookup(env::BOOTSTRAP_PEER) {
            config.network.bootstrap_peer = Some(parse_address(env::BOOTSTRAP_PEER, &peer)?);
        }
        if let Some(secs) = lookup(env::ROUND_TIMEOUT_SECS) {
            let secs: u64 = parse_value(env::ROUND_TIMEOUT_SECS, &secs)?;
            config.consensus.round_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: env::PORT,
                value: "0".to_string(),
            });
        }
        if let Some(bootstrap) = &self.network.bootstrap_peer {
            if *bootstrap == self.network.public_address()? {
                return Err(ConfigError::SelfBootstrap(bootstrap.clone()));
            }
        }
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Gateway(e.to_string()))
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_address(key: &'static str, value: &str) -> Result<NodeAddress, ConfigError> {
    NodeAddress::parse(value.trim()).map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("bootstrap peer {0} is this node's own address")]
    SelfBootstrap(NodeAddress),

    #[error("gateway: {0}")]
    Gateway(String),
}
