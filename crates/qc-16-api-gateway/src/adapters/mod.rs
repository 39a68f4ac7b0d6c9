//! Adapters layer (Hexagonal Architecture)

mod http_client;

pub use http_client::*;
