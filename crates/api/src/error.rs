//! API error taxonomy with stable machine-readable codes.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ethsig_verify::rfc3339_timestamp;

/// Stable `code` values returned in error bodies, so callers can branch
/// programmatically instead of parsing prose.
pub mod codes {
    pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";
    pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
    pub const MESSAGE_TOO_LONG: &str = "MESSAGE_TOO_LONG";
    pub const VERIFICATION_FAILED: &str = ethsig_verify::CODE_VERIFICATION_FAILED;
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const UNHANDLED_ERROR: &str = "UNHANDLED_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

/// Errors raised by the HTTP layer before or around the core verifier.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Message is required and must be a string")]
    InvalidMessage,

    #[error("Signature is required and must be a string")]
    InvalidSignature,

    #[error("Message too long (max {max} characters)")]
    MessageTooLong { max: usize },

    #[error("Endpoint not found")]
    NotFound,

    #[error("Internal server error during verification")]
    Internal,

    /// Catch-all for faults outside the validated request path (unreadable
    /// or unparseable bodies, oversized payloads). The detail is logged, not
    /// returned.
    #[error("Internal server error")]
    Unhandled(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMessage | Self::InvalidSignature | Self::MessageTooLong { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal | Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMessage => codes::INVALID_MESSAGE,
            Self::InvalidSignature => codes::INVALID_SIGNATURE,
            Self::MessageTooLong { .. } => codes::MESSAGE_TOO_LONG,
            Self::NotFound => codes::NOT_FOUND,
            Self::Internal => codes::INTERNAL_ERROR,
            Self::Unhandled(_) => codes::UNHANDLED_ERROR,
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub is_valid: bool,
    pub error: String,
    pub code: String,
    pub timestamp: String,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            is_valid: false,
            error: err.to_string(),
            code: err.code().to_string(),
            timestamp: rfc3339_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code_mapping() {
        let cases: Vec<(ApiError, StatusCode, &str)> = vec![
            (
                ApiError::InvalidMessage,
                StatusCode::BAD_REQUEST,
                codes::INVALID_MESSAGE,
            ),
            (
                ApiError::InvalidSignature,
                StatusCode::BAD_REQUEST,
                codes::INVALID_SIGNATURE,
            ),
            (
                ApiError::MessageTooLong { max: 10_000 },
                StatusCode::BAD_REQUEST,
                codes::MESSAGE_TOO_LONG,
            ),
            (
                ApiError::NotFound,
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
            ),
            (
                ApiError::Internal,
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL_ERROR,
            ),
            (
                ApiError::Unhandled("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::UNHANDLED_ERROR,
            ),
        ];

        for (err, expected_status, expected_code) in cases {
            assert_eq!(err.status(), expected_status);
            assert_eq!(err.code(), expected_code);
        }
    }

    #[test]
    fn test_unhandled_detail_not_exposed() {
        let err = ApiError::Unhandled("stack trace goes here".to_string());
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, "Internal server error");
        assert!(!body.error.contains("stack trace"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::from(&ApiError::MessageTooLong { max: 10_000 });
        assert!(!body.is_valid);
        assert_eq!(body.code, codes::MESSAGE_TOO_LONG);
        assert!(body.error.contains("10000"));
        assert!(!body.timestamp.is_empty());
    }
}
