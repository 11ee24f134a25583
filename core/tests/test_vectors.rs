//! Verify proxy parsing and request building against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so field ordering in
//! the vectors does not matter.

use api_client::{ApiClient, ApiError, Headers, HttpMethod, HttpRequest, ProxyAddress};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_error_kind(name: &str, err: &ApiError, expected: &str) {
    match expected {
        "Configuration" => assert!(matches!(err, ApiError::Configuration { .. }), "{name}: expected Configuration, got {err}"),
        "InvalidArgument" => assert!(matches!(err, ApiError::InvalidArgument { .. }), "{name}: expected InvalidArgument, got {err}"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

#[test]
fn proxy_test_vectors() {
    let raw = include_str!("../../test-vectors/proxy.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let result = ProxyAddress::parse(input);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
            // Client construction must fail the same way.
            let err = ApiClient::new(Some(input)).unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
        } else {
            let proxy = result.unwrap();
            let expected = &case["expected"];
            assert_eq!(proxy.scheme, expected["scheme"].as_str().unwrap(), "{name}: scheme");
            assert_eq!(proxy.host, expected["host"].as_str().unwrap(), "{name}: host");
            assert_eq!(u64::from(proxy.port), expected["port"].as_u64().unwrap(), "{name}: port");
        }
    }
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

fn build(client: &ApiClient, case: &Value) -> Result<HttpRequest, ApiError> {
    let uri = case["uri"].as_str().unwrap();
    let headers: Headers = serde_json::from_value(case["headers"].clone()).unwrap();
    match parse_method(case["method"].as_str().unwrap()) {
        HttpMethod::Get => client.build_get(uri, &headers),
        HttpMethod::Post => client.build_post(uri, &headers, &case["body"]),
        HttpMethod::Put => client.build_put(uri, &headers, &case["body"]),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = ApiClient::new(None).unwrap();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = build(&client, case);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
            continue;
        }

        let req = result.unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(case["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.uri, expected_req["uri"].as_str().unwrap(), "{name}: uri");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match &expected_req["body"] {
            Value::Null if req.method == HttpMethod::Get => {
                assert!(req.body.is_none(), "{name}: body should be None")
            }
            expected_body => {
                let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&req_body, expected_body, "{name}: body");
            }
        }
    }
}
