//! Proxy address parsing.
//!
//! Accepts `[scheme://]host[:port]`. A missing scheme becomes `https`, a
//! missing port becomes the scheme's well-known port.

use std::fmt;

use url::Url;

use crate::error::{ApiError, Result};

const DEFAULT_SCHEME: &str = "https";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl ProxyAddress {
    pub fn parse(address: &str) -> Result<Self> {
        let normalized = normalize(address);
        let url = Url::parse(&normalized).map_err(|e| ApiError::configuration(address, e))?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(ApiError::configuration(address, url::ParseError::EmptyHost)),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ApiError::configuration(address, url::ParseError::InvalidPort))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port,
        })
    }

    pub(crate) fn to_transport_proxy(&self) -> Result<ureq::Proxy> {
        let uri = self.to_string();
        ureq::Proxy::new(&uri).map_err(|e| ApiError::configuration(&uri, e))
    }
}

impl fmt::Display for ProxyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Prepend the default scheme when the address has none.
pub fn normalize(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{address}")
    }
}
