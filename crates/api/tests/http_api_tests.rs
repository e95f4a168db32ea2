//! End-to-end tests driving the API service through its tower interface.

use std::sync::Arc;

use http::{header, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use serde_json::{json, Value};
use tower::Service;

use ethsig_api::{codes, ApiServerConfig, ApiService, SERVICE_VERSION};
use ethsig_operations::MetricsRegistry;
use ethsig_signer::LocalSigningKey;

fn test_service() -> ApiService {
    let config = ApiServerConfig::default();
    let metrics = Arc::new(MetricsRegistry::new());
    ApiService::build(&config, metrics).expect("build service")
}

async fn send(
    service: &mut ApiService,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value, Response<Full<Bytes>>) {
    let body = match body {
        Some(value) => Full::new(Bytes::from(serde_json::to_vec(&value).unwrap())),
        None => Full::new(Bytes::new()),
    };
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let response = service.call(request).await.unwrap();
    let status = response.status();

    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else if parts
        .headers
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap_or_default().starts_with("application/json"))
        .unwrap_or(false)
    {
        serde_json::from_slice(&bytes).unwrap()
    } else {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    };

    (status, json, Response::from_parts(parts, Full::new(bytes)))
}

async fn post_verify(service: &mut ApiService, body: Value) -> (StatusCode, Value) {
    let (status, json, _) = send(service, Method::POST, "/verify-signature", Some(body)).await;
    (status, json)
}

#[tokio::test]
async fn test_verify_signature_end_to_end() {
    let mut service = test_service();

    let key = LocalSigningKey::random();
    let signature = key.sign_personal("hello world").unwrap();

    let (status, body) = post_verify(
        &mut service,
        json!({ "message": "hello world", "signature": signature }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], true);
    assert_eq!(body["signer"], key.address().to_checksum(None));
    assert_eq!(body["originalMessage"], "hello world");
    assert_eq!(body["signature"], signature);
    assert_eq!(body["verificationMethod"], "ethereum_personal_sign");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_verify_is_idempotent_for_same_pair() {
    let mut service = test_service();

    let key = LocalSigningKey::random();
    let signature = key.sign_personal("again and again").unwrap();
    let request = json!({ "message": "again and again", "signature": signature });

    let (_, first) = post_verify(&mut service, request.clone()).await;
    let (_, second) = post_verify(&mut service, request).await;

    assert_eq!(first["signer"], second["signer"]);
}

#[tokio::test]
async fn test_signature_over_other_message_still_verifies() {
    let mut service = test_service();

    let key = LocalSigningKey::random();
    let signature = key.sign_personal("what I signed").unwrap();

    // No expected-signer comparison happens, so the recovered (different)
    // address is reported as a valid outcome.
    let (status, body) = post_verify(
        &mut service,
        json!({ "message": "what you claim I signed", "signature": signature }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], true);
    assert_ne!(body["signer"], key.address().to_checksum(None));
}

#[tokio::test]
async fn test_malformed_signature_is_verification_failed() {
    let mut service = test_service();

    let wrong_length = format!("0x{}", "11".repeat(64));
    for bad in ["0xdeadbeef", "not hex at all", wrong_length.as_str()] {
        let (status, body) = post_verify(
            &mut service,
            json!({ "message": "hello", "signature": bad }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "signature: {bad}");
        assert_eq!(body["isValid"], false);
        assert_eq!(body["code"], codes::VERIFICATION_FAILED);
        assert_eq!(body["originalMessage"], "hello");
    }
}

#[tokio::test]
async fn test_missing_fields_are_field_specific_errors() {
    let mut service = test_service();

    let (status, body) = post_verify(&mut service, json!({ "signature": "0xabcd" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], codes::INVALID_MESSAGE);

    let (status, body) = post_verify(&mut service, json!({ "message": "hello" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], codes::INVALID_SIGNATURE);

    let (status, body) = post_verify(
        &mut service,
        json!({ "message": 42, "signature": "0xabcd" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], codes::INVALID_MESSAGE);
}

#[tokio::test]
async fn test_over_long_message_rejected() {
    let mut service = test_service();

    let (status, body) = post_verify(
        &mut service,
        json!({ "message": "a".repeat(10_001), "signature": "0xabcd" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], codes::MESSAGE_TOO_LONG);
}

#[tokio::test]
async fn test_unparseable_body_is_unhandled_error() {
    let mut service = test_service();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/verify-signature")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(b"{not json")))
        .unwrap();

    let response = service.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], codes::UNHANDLED_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut service = test_service();

    let (status, body, _) = send(&mut service, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], SERVICE_VERSION);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_api_info_endpoint() {
    let mut service = test_service();

    let (status, body, _) = send(&mut service, Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]
        .as_object()
        .unwrap()
        .contains_key("POST /verify-signature"));
    assert_eq!(body["supportedFormats"][0], "ethereum_personal_sign");
}

#[tokio::test]
async fn test_unmatched_route_is_404() {
    let mut service = test_service();

    let (status, body, _) = send(&mut service, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["isValid"], false);
    assert_eq!(body["code"], codes::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");

    // Wrong method on a known path is also unmatched.
    let (status, _, _) = send(&mut service, Method::GET, "/verify-signature", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let mut service = test_service();

    let (_, _, response) = send(&mut service, Method::GET, "/health", None).await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );

    let (_, _, response) = send(&mut service, Method::GET, "/missing", None).await;
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_some());
}

#[tokio::test]
async fn test_preflight_request() {
    let mut service = test_service();

    let (status, _, response) =
        send(&mut service, Method::OPTIONS, "/verify-signature", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap(),
        "GET, POST, OPTIONS"
    );
}

#[tokio::test]
async fn test_metrics_endpoint_counts_requests() {
    let mut service = test_service();

    let key = LocalSigningKey::random();
    let signature = key.sign_personal("counted").unwrap();
    let _ = post_verify(
        &mut service,
        json!({ "message": "counted", "signature": signature }),
    )
    .await;

    let (status, body, _) = send(&mut service, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap().to_string();
    assert!(text.contains("ethsig_http_requests"));
    assert!(text.contains("/verify-signature"));
    assert!(text.contains("ethsig_verifications"));
}

#[tokio::test]
async fn test_metrics_endpoint_disabled() {
    let config = ApiServerConfig {
        metrics_enabled: false,
        ..Default::default()
    };
    let metrics = Arc::new(MetricsRegistry::new());
    let mut service = ApiService::build(&config, metrics).unwrap();

    let (status, _, _) = send(&mut service, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
