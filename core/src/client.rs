//! Blocking HTTP client that encodes JSON requests and decodes responses.
//!
//! # Design
//! `ApiClient` holds a configured `ureq::Agent` and a `JsonCodec`, nothing
//! else, and never mutates either after construction. Each operation is split
//! into a `build_*` method producing an `HttpRequest` and the shared `send`
//! pipeline that performs exactly one round trip and decodes the body into
//! the caller's `DecodeTarget`.
//!
//! Responses are decoded whatever their status code. The agent is built with
//! `http_status_as_error(false)` so a 4xx/5xx response reaches the decoder
//! and the caller reads the status from `ApiResponse`.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::codec::JsonCodec;
use crate::config::ApiClientConfig;
use crate::decode::{DecodeTarget, JsonTree, RawBody, Text};
use crate::error::{ApiError, Result};
use crate::http::{ApiResponse, HttpMethod, HttpRequest, APPLICATION_JSON_CHARSET_UTF_8, CONTENT_TYPE};
use crate::proxy::ProxyAddress;

/// Caller-supplied request headers.
pub type Headers = BTreeMap<String, String>;

/// Generic JSON API client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    codec: JsonCodec,
    proxy: Option<ProxyAddress>,
    max_response_body: Option<u64>,
}

impl ApiClient {
    /// Client with default settings, optionally routed through `proxy`.
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        Self::with_config(ApiClientConfig {
            proxy: proxy.map(str::to_string),
            ..ApiClientConfig::default()
        })
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    pub fn with_config(config: ApiClientConfig) -> Result<Self> {
        let proxy = config.proxy.as_deref().map(ProxyAddress::parse).transpose()?;
        let transport_proxy = proxy.as_ref().map(ProxyAddress::to_transport_proxy).transpose()?;

        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .proxy(transport_proxy)
            .timeout_global(config.timeout)
            .timeout_connect(config.connect_timeout)
            .max_redirects(config.max_redirects)
            .build()
            .new_agent();

        if let Some(proxy) = &proxy {
            tracing::debug!(%proxy, "Routing requests through proxy");
        }

        Ok(Self {
            agent,
            codec: JsonCodec::new(),
            proxy,
            max_response_body: config.max_response_body,
        })
    }

    /// The proxy this client routes through, if any.
    pub fn proxy(&self) -> Option<&ProxyAddress> {
        self.proxy.as_ref()
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// GET `uri` and return the body as text, whatever the status code.
    pub fn get_html(&self, uri: &str) -> Result<String> {
        Ok(self.get_as::<Text>(uri, &Headers::new())?.body)
    }

    /// GET `uri` and decode the body as a JSON tree.
    pub fn get(&self, uri: &str, headers: &Headers) -> Result<ApiResponse<Value>> {
        self.get_as::<JsonTree>(uri, headers)
    }

    pub fn get_as<D: DecodeTarget>(&self, uri: &str, headers: &Headers) -> Result<ApiResponse<D::Output>> {
        let request = self.build_get(uri, headers)?;
        self.send::<D>(&request)
    }

    /// POST `body` as JSON and decode the response into `D`.
    pub fn post<D, B>(&self, uri: &str, headers: &Headers, body: &B) -> Result<ApiResponse<D::Output>>
    where
        D: DecodeTarget,
        B: Serialize + ?Sized,
    {
        let request = self.build_post(uri, headers, body)?;
        self.send::<D>(&request)
    }

    /// PUT `body` as JSON and decode the response as a JSON tree.
    pub fn put<B>(&self, uri: &str, headers: &Headers, body: &B) -> Result<ApiResponse<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.put_as::<JsonTree, B>(uri, headers, body)
    }

    pub fn put_as<D, B>(&self, uri: &str, headers: &Headers, body: &B) -> Result<ApiResponse<D::Output>>
    where
        D: DecodeTarget,
        B: Serialize + ?Sized,
    {
        let request = self.build_put(uri, headers, body)?;
        self.send::<D>(&request)
    }

    pub fn build_get(&self, uri: &str, headers: &Headers) -> Result<HttpRequest> {
        build_request(HttpMethod::Get, uri, headers, None)
    }

    pub fn build_post<B: Serialize + ?Sized>(&self, uri: &str, headers: &Headers, body: &B) -> Result<HttpRequest> {
        let body = self.codec.encode(body)?;
        build_request(HttpMethod::Post, uri, headers, Some(body))
    }

    pub fn build_put<B: Serialize + ?Sized>(&self, uri: &str, headers: &Headers, body: &B) -> Result<HttpRequest> {
        let body = self.codec.encode(body)?;
        build_request(HttpMethod::Put, uri, headers, Some(body))
    }

    /// Execute `request` and decode the response body into `D`.
    ///
    /// The request is validated again first, so hand-built requests fail
    /// with `InvalidArgument` before anything is sent.
    pub fn send<D: DecodeTarget>(&self, request: &HttpRequest) -> Result<ApiResponse<D::Output>> {
        validate_request(request)?;
        tracing::info!(method = %request.method, uri = %request.uri, "Send request");

        let response = self.execute(request)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        tracing::debug!(status, uri = %request.uri, "Received response");

        let mut body = response.into_body();
        let raw = if D::STREAMING {
            RawBody::Stream(Box::new(body.into_reader()))
        } else {
            let limit = self.max_response_body.unwrap_or(u64::MAX);
            let bytes = body.with_config().limit(limit).read_to_vec()?;
            RawBody::Text(String::from_utf8_lossy(&bytes).into_owned())
        };

        Ok(ApiResponse {
            status,
            headers,
            body: D::decode(raw, &self.codec)?,
        })
    }

    fn execute(&self, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>> {
        let uri = request.uri.as_str();
        let headers = &request.headers;
        let response = match (request.method, &request.body) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(uri), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(uri), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(uri), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(uri), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(uri), headers).send_empty(),
            (HttpMethod::Get, Some(_)) => {
                return Err(ApiError::invalid_argument("GET request cannot carry a body", "body present"))
            }
        }?;
        Ok(response)
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Validate `uri` and headers and assemble the request. JSON bodies get the
/// default content type first so caller headers can override it.
fn build_request(method: HttpMethod, uri: &str, headers: &Headers, body: Option<String>) -> Result<HttpRequest> {
    let mut request = HttpRequest {
        method,
        uri: validate_uri(uri)?,
        headers: Vec::with_capacity(headers.len() + 1),
        body,
    };
    if request.body.is_some() {
        request.set_header(CONTENT_TYPE, APPLICATION_JSON_CHARSET_UTF_8);
    }
    for (name, value) in headers {
        validate_header(name, value)?;
        request.set_header(name.as_str(), value.as_str());
    }
    Ok(request)
}

fn validate_uri(uri: &str) -> Result<String> {
    let url = Url::parse(uri).map_err(|e| ApiError::invalid_argument(format!("invalid URI `{uri}`"), e))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(ApiError::invalid_argument(
            format!("invalid URI `{uri}`"),
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn validate_request(request: &HttpRequest) -> Result<()> {
    validate_uri(&request.uri)?;
    for (name, value) in &request.headers {
        validate_header(name, value)?;
    }
    if request.method == HttpMethod::Get && request.body.is_some() {
        return Err(ApiError::invalid_argument(
            format!("GET {} cannot carry a body", request.uri),
            "body present",
        ));
    }
    Ok(())
}

fn validate_header(name: &str, value: &str) -> Result<()> {
    ureq::http::HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ApiError::invalid_argument(format!("invalid header name `{name}`"), e))?;
    ureq::http::HeaderValue::from_str(value)
        .map_err(|e| ApiError::invalid_argument(format!("invalid value for header `{name}`"), e))?;
    Ok(())
}

/// Builder for an `ApiClient` with custom transport settings.
#[derive(Debug, Clone, Default)]
pub struct ApiClientBuilder {
    config: ApiClientConfig,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. `ApiClientConfig::from_env()`.
    pub fn from_config(config: ApiClientConfig) -> Self {
        Self { config }
    }

    pub fn proxy(mut self, address: impl Into<String>) -> Self {
        self.config.proxy = Some(address.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn max_redirects(mut self, max: u32) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Cap on buffered response bodies. Larger bodies fail with a transport error.
    pub fn max_response_body(mut self, bytes: u64) -> Self {
        self.config.max_response_body = Some(bytes);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        ApiClient::with_config(self.config)
    }
}
