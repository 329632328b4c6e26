//! Verify request building and response interpretation against the JSON
//! vectors stored in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so field order in the
//! serializer does not matter.

use grocery_core::{parse_response, ApiClient, ApiError, HttpMethod, HttpResponse, UiService, UreqTransport};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let (ui, _) = UiService::recording();
    let client = ApiClient::new(
        vectors["base_url"].as_str().unwrap(),
        UreqTransport::default(),
        ui,
    );

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());
        let payload = case.get("payload");
        let expected = &case["expected_request"];

        let req = client
            .build_request(method, case["path"].as_str().unwrap(), payload)
            .unwrap();
        assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())],
            "{name}: headers"
        );

        let body = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str::<Value>(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(body, expected["body"], "{name}: body");
    }
}

#[test]
fn error_contract_vectors() {
    let raw = include_str!("../../test-vectors/error_contract.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::new(
            case["response"]["status"].as_u64().unwrap() as u16,
            case["response"]["body"].as_str().unwrap(),
        );
        let expected = &case["expected"];
        let result = parse_response(response);

        if let Some(ok) = expected.get("ok") {
            assert_eq!(result.as_ref().ok(), Some(ok), "{name}: value");
            continue;
        }

        let err = result.expect_err(name);
        let kind = match &err {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Http { .. } => "http",
            ApiError::Network(_) => "network",
            ApiError::Deserialization(_) => "deserialization",
            ApiError::Serialization(_) => "serialization",
        };
        assert_eq!(kind, expected["kind"].as_str().unwrap(), "{name}: kind");

        if let Some(message) = expected.get("message") {
            assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}: message");
        }
        if let Some(status) = expected.get("status") {
            assert_eq!(err.status().map(u64::from), status.as_u64(), "{name}: status");
        }
        assert_eq!(err.details(), expected["details"].as_str(), "{name}: details");
        if let Some(conflict) = expected.get("conflict") {
            assert_eq!(err.is_conflict(), conflict.as_bool().unwrap(), "{name}: conflict");
        }
    }
}
