//! Client configuration.

use std::time::Duration;

pub const ENV_PROXY: &str = "API_CLIENT_PROXY";
pub const ENV_TIMEOUT_SECS: &str = "API_CLIENT_TIMEOUT_SECS";

/// Transport settings applied when an `ApiClient` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Proxy address, `[scheme://]host[:port]`.
    pub proxy: Option<String>,
    /// Whole-request timeout.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Redirects followed by the transport. Zero disables following.
    pub max_redirects: u32,
    /// Cap on buffered response bodies in bytes. `None` reads bodies of any size.
    pub max_response_body: Option<u64>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            max_redirects: 10,
            max_response_body: None,
        }
    }
}

impl ApiClientConfig {
    /// Defaults overridden by `API_CLIENT_PROXY` and `API_CLIENT_TIMEOUT_SECS`.
    ///
    /// An unparseable timeout value is ignored and logged.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(proxy) = lookup(ENV_PROXY).filter(|p| !p.trim().is_empty()) {
            config.proxy = Some(proxy);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid API_CLIENT_TIMEOUT_SECS"),
            }
        }
        config
    }
}
