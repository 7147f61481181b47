//! Transport session configuration.
//!
//! [`ClientConfig`] only affects the default [`ReqwestTransport`]. A custom
//! transport brings its own session settings.
//!
//! [`ReqwestTransport`]: crate::client::ReqwestTransport

use serde::{Deserialize, Serialize};

/// Configuration of the default reqwest-backed transport.
///
/// # Examples
///
/// ```
/// use netman::client::ClientConfig;
///
/// let config = ClientConfig {
///     request_timeout_ms: 5_000,
///     ..Default::default()
/// };
/// assert!(config.cookie_store);
///
/// let uploads = ClientConfig::no_cookies();
/// assert_eq!(uploads.request_timeout_ms, 600_000);
/// assert!(!uploads.cookie_store);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// How long idle pooled connections are kept, in seconds
    pub pool_idle_timeout_secs: u64,
    /// Maximum idle connections kept per host
    pub max_idle_connections_per_host: u32,
    /// Proxy for all traffic; empty means no proxy
    pub proxy_url: String,
    /// Store cookies from responses and send them on later requests
    pub cookie_store: bool,
    /// Log every dispatched request at debug level
    pub enable_logging: bool,
}

impl ClientConfig {
    /// Long-running session that never stores or sends cookies.
    pub fn no_cookies() -> Self {
        ClientConfig {
            request_timeout_ms: 600_000,
            cookie_store: false,
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 30_000,
            pool_idle_timeout_secs: 90,
            max_idle_connections_per_host: 10,
            proxy_url: String::new(),
            cookie_store: true,
            enable_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.pool_idle_timeout_secs, 90);
        assert!(config.proxy_url.is_empty());
        assert!(config.cookie_store);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"request_timeout_ms": 1500, "enable_logging": true}"#).unwrap();
        assert_eq!(config.request_timeout_ms, 1500);
        assert!(config.enable_logging);
        assert_eq!(config.max_idle_connections_per_host, 10);
    }
}
