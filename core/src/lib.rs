//! Generic blocking HTTP client for JSON APIs.
//!
//! # Overview
//! `ApiClient` issues GET/POST/PUT requests, optionally through a proxy,
//! encodes request bodies as JSON and decodes response bodies into a target
//! picked per call: raw bytes, text, a `serde_json::Value` tree or any
//! `Deserialize` type.
//!
//! # Design
//! - The client owns its transport agent and JSON codec; there is no global
//!   state.
//! - Requests are built as plain `HttpRequest` data, then executed by one
//!   `send` pipeline that makes a single round trip.
//! - Decode targets are marker types implementing `DecodeTarget`.
//! - Every status code is decoded; the status travels on `ApiResponse`.

pub mod client;
pub mod codec;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod proxy;

pub use client::{ApiClient, ApiClientBuilder, Headers};
pub use codec::JsonCodec;
pub use config::ApiClientConfig;
pub use decode::{ByteStream, Bytes, DecodeTarget, JsonTree, RawBody, Text, Typed};
pub use error::{ApiError, Result};
pub use http::{ApiResponse, HttpMethod, HttpRequest, APPLICATION_JSON_CHARSET_UTF_8, CONTENT_TYPE};
pub use proxy::ProxyAddress;
