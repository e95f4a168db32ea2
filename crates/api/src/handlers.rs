//! Request handlers and response shaping.

use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Bytes;
use serde::Deserialize;
use serde_json::Value;

use ethsig_verify::{verify_message, VerificationRequest};

use crate::error::{codes, ApiError, ErrorBody};
use crate::health::{ApiInfo, HealthStatus};
use crate::service::ApiState;

/// Loosely-typed request body. Fields are kept as raw JSON values so each
/// can be validated separately with its own error code.
#[derive(Debug, Deserialize)]
struct RawVerifyRequest {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    signature: Option<Value>,
}

/// `POST /verify-signature`
pub(crate) async fn verify_signature<B>(state: &ApiState, req: Request<B>) -> Response<Full<Bytes>>
where
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = match read_body(req.into_body(), state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => return error_response(&err),
    };

    let request = match parse_and_validate(&body, state.max_message_chars) {
        Ok(request) => request,
        Err(err) => return error_response(&err),
    };

    let outcome = verify_message(&request.message, &request.signature);
    state.metrics.service.record_verification(outcome.is_valid());

    let status = if outcome.is_valid() {
        StatusCode::OK
    } else {
        tracing::debug!("signature verification failed");
        StatusCode::BAD_REQUEST
    };
    json_response(status, &outcome)
}

/// `GET /health`
pub(crate) fn health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &HealthStatus::healthy())
}

/// `GET /api`
pub(crate) fn api_info() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &ApiInfo::current())
}

/// `GET /metrics`
pub(crate) fn metrics(state: &ApiState) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(
            http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )
        .body(Full::new(Bytes::from(state.metrics.encode_prometheus())))
        .expect("static response")
}

/// Shape an [`ApiError`] into its JSON response.
pub(crate) fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    if let ApiError::Unhandled(detail) = err {
        tracing::error!("unhandled request error: {}", detail);
    }
    json_response(err.status(), &ErrorBody::from(err))
}

/// Collect the request body, capped at `max_bytes`.
async fn read_body<B>(body: B, max_bytes: usize) -> Result<Bytes, ApiError>
where
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(body, max_bytes)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|err| ApiError::Unhandled(format!("failed to read request body: {err}")))
}

/// Validate the request shape before the core verifier runs.
///
/// The message length limit is counted in Unicode scalar values (`chars()`),
/// not bytes or UTF-16 units.
fn parse_and_validate(body: &[u8], max_message_chars: usize) -> Result<VerificationRequest, ApiError> {
    let raw: RawVerifyRequest = serde_json::from_slice(body)
        .map_err(|err| ApiError::Unhandled(format!("request body is not valid JSON: {err}")))?;

    let message = match raw.message {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return Err(ApiError::InvalidMessage),
    };

    let signature = match raw.signature {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return Err(ApiError::InvalidSignature),
    };

    if message.chars().count() > max_message_chars {
        return Err(ApiError::MessageTooLong {
            max: max_message_chars,
        });
    }

    Ok(VerificationRequest { message, signature })
}

/// Serialize a value into a JSON response with the given status.
fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("static response"),
        Err(err) => {
            tracing::error!("failed to serialize response body: {}", err);
            let fallback = format!(
                r#"{{"isValid":false,"error":"Internal server error during verification","code":"{}"}}"#,
                codes::INTERNAL_ERROR
            );
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(fallback)))
                .expect("static response")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MAX_CHARS: usize = 10_000;

    fn validate(json: &str) -> Result<VerificationRequest, ApiError> {
        parse_and_validate(json.as_bytes(), MAX_CHARS)
    }

    #[test]
    fn test_valid_request_passes() {
        let request = validate(r#"{"message":"hello","signature":"0xabcd"}"#).unwrap();
        assert_eq!(request.message, "hello");
        assert_eq!(request.signature, "0xabcd");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let request =
            validate(r#"{"message":"hello","signature":"0xabcd","extra":42}"#).unwrap();
        assert_eq!(request.message, "hello");
    }

    #[test]
    fn test_missing_message_rejected() {
        let err = validate(r#"{"signature":"0xabcd"}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidMessage));
    }

    #[test]
    fn test_non_string_message_rejected() {
        let err = validate(r#"{"message":42,"signature":"0xabcd"}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidMessage));
    }

    #[test]
    fn test_empty_message_rejected() {
        let err = validate(r#"{"message":"","signature":"0xabcd"}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidMessage));
    }

    #[test]
    fn test_missing_signature_rejected() {
        let err = validate(r#"{"message":"hello"}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidSignature));
    }

    #[test]
    fn test_non_string_signature_rejected() {
        let err = validate(r#"{"message":"hello","signature":[1,2]}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidSignature));
    }

    #[test]
    fn test_message_validated_before_signature() {
        let err = validate(r#"{}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidMessage));
    }

    #[test]
    fn test_message_length_limit() {
        let at_limit = "a".repeat(MAX_CHARS);
        let body = serde_json::json!({ "message": at_limit, "signature": "0xabcd" });
        assert!(parse_and_validate(&serde_json::to_vec(&body).unwrap(), MAX_CHARS).is_ok());

        let over_limit = "a".repeat(MAX_CHARS + 1);
        let body = serde_json::json!({ "message": over_limit, "signature": "0xabcd" });
        let err = parse_and_validate(&serde_json::to_vec(&body).unwrap(), MAX_CHARS).unwrap_err();
        assert!(matches!(err, ApiError::MessageTooLong { max: MAX_CHARS }));
    }

    #[test]
    fn test_message_length_counts_chars_not_bytes() {
        // 10,000 three-byte characters is 30,000 bytes but exactly at the limit.
        let multibyte = "€".repeat(MAX_CHARS);
        let body = serde_json::json!({ "message": multibyte, "signature": "0xabcd" });
        assert!(parse_and_validate(&serde_json::to_vec(&body).unwrap(), MAX_CHARS).is_ok());
    }

    #[test]
    fn test_invalid_json_maps_to_unhandled() {
        let err = validate("not json at all").unwrap_err();
        assert!(matches!(err, ApiError::Unhandled(_)));
        assert_eq!(err.code(), codes::UNHANDLED_ERROR);
    }
}
