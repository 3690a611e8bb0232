//! Listener settings for the REST API.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// How the API is exposed.
///
/// ```
/// use shop_axum::config::AxumConfig;
///
/// let config = AxumConfig::default();
/// assert_eq!(config.bind_address.port(), 8080);
/// assert_eq!(config.max_body_bytes, 64 * 1024);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AxumConfig {
    /// Socket the server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Largest request body accepted. A checkout is a few hundred bytes per
    /// line, so anything near the limit is rejected as `413`.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for AxumConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}
