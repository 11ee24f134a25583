use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const ECHO_HTML: &str =
    "<!DOCTYPE html><html><head><title>Echo</title></head><body><h1>Echo</h1></body></html>";

/// What the server saw of a request, sent back as the response body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub headers: BTreeMap<String, String>,
    /// The request body parsed as JSON, a JSON string if it was not JSON,
    /// or null if it was empty.
    pub body: Value,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(html))
        .route("/echo/get/json", get(json_fixture))
        .route("/echo/post/json", post(echo))
        .route("/echo/put/json", put(echo))
        .route("/headers", get(echo))
        .route("/status/{code}", get(status))
        .route("/bytes/{len}", get(bytes))
        .route("/delay/{ms}", get(delay))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn html() -> Html<&'static str> {
    Html(ECHO_HTML)
}

async fn json_fixture() -> Json<Value> {
    Json(json!({
        "id": 1,
        "name": "test",
        "tags": ["a", "b"],
        "owner": { "login": "octo", "active": true }
    }))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    tracing::debug!(%method, len = body.len(), "echo");
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let headers = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    Json(Echo {
        method: method.to_string(),
        content_type,
        headers,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(json!({ "status": code }))))
}

async fn bytes(Path(len): Path<usize>) -> impl IntoResponse {
    let body: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
    ([(header::CONTENT_TYPE, "application/octet-stream")], body)
}

async fn delay(Path(ms): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({ "delayed_ms": ms }))
}
