//! HTTP request and response types.
//!
//! # Design
//! `HttpRequest` describes a request as plain data. `ApiClient::build_*`
//! produces it without touching the network and `ApiClient::send` executes
//! it, so URI validation, header merging and body encoding can be checked in
//! isolation.

use std::fmt;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON_CHARSET_UTF_8: &str = "application/json;charset=UTF-8";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `uri` is always an absolute URI that already passed validation. Header
/// names are unique ignoring ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// A response whose body has been decoded into the requested target.
///
/// Responses of every status code are decoded; check `status` or
/// `is_success` before trusting the body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: T,
}

impl<T> ApiResponse<T> {
    /// `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn into_body(self) -> T {
        self.body
    }

    /// Transform the body while keeping status and headers.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            uri: "http://localhost:3000/items".to_string(),
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON_CHARSET_UTF_8.to_string())],
            body: Some("{}".to_string()),
        }
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = request();
        req.set_header("content-type", "text/plain");
        assert_eq!(req.headers, vec![("content-type".to_string(), "text/plain".to_string())]);
        assert_eq!(req.header("CONTENT-TYPE"), Some("text/plain"));
    }

    #[test]
    fn set_header_appends_new_names() {
        let mut req = request();
        req.set_header("X-Trace", "abc");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header("x-trace"), Some("abc"));
    }

    #[test]
    fn request_displays_method_and_uri() {
        assert_eq!(request().to_string(), "POST http://localhost:3000/items");
    }

    #[test]
    fn response_success_range() {
        let ok = ApiResponse { status: 204, headers: Vec::new(), body: () };
        let missing = ApiResponse { status: 404, headers: Vec::new(), body: () };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn response_map_keeps_status() {
        let resp = ApiResponse {
            status: 201,
            headers: vec![("Location".to_string(), "/items/1".to_string())],
            body: "1",
        };
        let mapped = resp.map(|b| b.parse::<u32>().unwrap());
        assert_eq!(mapped.status, 201);
        assert_eq!(mapped.header("location"), Some("/items/1"));
        assert_eq!(mapped.into_body(), 1);
    }
}
