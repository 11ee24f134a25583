//! Error types for the API client.
//!
//! # Design
//! One variant per failure class a caller can act on differently. Every
//! variant keeps the underlying error as its `source()` so diagnostics see
//! the original cause. HTTP status codes are not errors here: responses of
//! any status are decoded and the status is reported on `ApiResponse`.

use std::error::Error as StdError;

/// Boxed cause for variants whose origin can be one of several error types.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors returned by `ApiClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The proxy address could not be parsed or installed on the transport.
    #[error("invalid proxy address `{address}`: {source}")]
    Configuration {
        address: String,
        #[source]
        source: BoxError,
    },

    /// A request URI or header was rejected before anything was sent.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
        #[source]
        source: BoxError,
    },

    /// Connection, DNS, TLS, timeout or body I/O failure.
    #[error("transport failure: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body does not match the requested decode target.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub(crate) fn configuration(address: &str, source: impl Into<BoxError>) -> Self {
        ApiError::Configuration {
            address: address.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ApiError::InvalidArgument {
            message: message.into(),
            source: source.into(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Transport(ureq::Error::Io(err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_keeps_cause() {
        let cause = url::Url::parse("https://bad host").unwrap_err();
        let err = ApiError::configuration("bad host", cause);
        assert!(err.to_string().contains("`bad host`"));
        assert!(err.source().is_some());
    }

    #[test]
    fn io_error_maps_to_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = ApiError::from(io);
        assert!(matches!(err, ApiError::Transport(ureq::Error::Io(_))));
    }

    #[test]
    fn decode_error_exposes_serde_source() {
        let cause = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::Decode(cause);
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }
}
