//! Configuration validation.
//!
//! Validates configuration and collects all errors before returning,
//! enabling users to fix multiple issues in a single iteration.

use crate::config::types::{
    CorsConfig, ObservabilityConfig, OperationsConfig, RateLimitConfig, ServerConfig,
    ServiceConfig, VerificationConfig,
};
use crate::errors::ConfigError;
use std::net::SocketAddr;

/// Minimum accepted request body size: 1KB.
const MIN_BODY_BYTES: usize = 1024;
/// Maximum accepted request body size: 100MB.
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Upper bound on the message length limit.
const MAX_MESSAGE_CHARS_CEILING: usize = 1_000_000;

/// Minimum shutdown timeout: 1 second.
const MIN_SHUTDOWN_TIMEOUT: u64 = 1;
/// Maximum shutdown timeout: 300 seconds (5 minutes).
const MAX_SHUTDOWN_TIMEOUT: u64 = 300;

/// Validate the entire service configuration.
///
/// Collects all validation errors and returns them together, allowing users
/// to fix multiple issues at once.
pub fn validate_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    validate_server_config(&config.server, &mut errors);
    validate_cors_config(&config.cors, &mut errors);
    validate_verification_config(&config.verification, &mut errors);
    validate_rate_limit_config(&config.rate_limit, &mut errors);
    validate_observability_config(&config.observability, &mut errors);
    validate_operations_config(&config.operations, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(errors))
    }
}

fn validate_server_config(config: &ServerConfig, errors: &mut Vec<String>) {
    if config.listen_addr.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "server.listen_addr '{}' is not a valid host:port address",
            config.listen_addr
        ));
    }

    if config.max_body_bytes < MIN_BODY_BYTES {
        errors.push(format!(
            "server.max_body_bytes must be at least {} bytes",
            MIN_BODY_BYTES
        ));
    }

    if config.max_body_bytes > MAX_BODY_BYTES {
        errors.push(format!(
            "server.max_body_bytes must be at most {} bytes ({} MB)",
            MAX_BODY_BYTES,
            MAX_BODY_BYTES / (1024 * 1024)
        ));
    }
}

fn validate_cors_config(config: &CorsConfig, errors: &mut Vec<String>) {
    if config.allowed_origin.is_empty() {
        errors.push("cors.allowed_origin cannot be empty".to_string());
    } else if !config.allowed_origin.starts_with("http://")
        && !config.allowed_origin.starts_with("https://")
    {
        errors.push(format!(
            "cors.allowed_origin '{}' must be an http(s) origin",
            config.allowed_origin
        ));
    }
}

fn validate_verification_config(config: &VerificationConfig, errors: &mut Vec<String>) {
    if config.max_message_chars == 0 {
        errors.push("verification.max_message_chars must be greater than 0".to_string());
    }

    if config.max_message_chars > MAX_MESSAGE_CHARS_CEILING {
        errors.push(format!(
            "verification.max_message_chars must be at most {}",
            MAX_MESSAGE_CHARS_CEILING
        ));
    }
}

fn validate_rate_limit_config(config: &RateLimitConfig, errors: &mut Vec<String>) {
    if config.window_ms == 0 {
        errors.push("rate_limit.window_ms must be greater than 0".to_string());
    }

    if config.max_requests == 0 {
        errors.push("rate_limit.max_requests must be greater than 0".to_string());
    }
}

fn validate_observability_config(config: &ObservabilityConfig, errors: &mut Vec<String>) {
    let valid_levels = ["trace", "debug", "info", "warn", "warning", "error"];
    if !valid_levels.contains(&config.log_level.to_lowercase().as_str()) {
        errors.push(format!(
            "observability.log_level '{}' is invalid. Valid levels: trace, debug, info, warn, error",
            config.log_level
        ));
    }

    let valid_formats = ["json", "pretty", "text", "human"];
    if !valid_formats.contains(&config.log_format.to_lowercase().as_str()) {
        errors.push(format!(
            "observability.log_format '{}' is invalid. Valid formats: json, pretty",
            config.log_format
        ));
    }
}

fn validate_operations_config(config: &OperationsConfig, errors: &mut Vec<String>) {
    if config.shutdown_timeout_secs < MIN_SHUTDOWN_TIMEOUT {
        errors.push(format!(
            "operations.shutdown_timeout_secs must be at least {} second(s)",
            MIN_SHUTDOWN_TIMEOUT
        ));
    }

    if config.shutdown_timeout_secs > MAX_SHUTDOWN_TIMEOUT {
        errors.push(format!(
            "operations.shutdown_timeout_secs must be at most {} seconds",
            MAX_SHUTDOWN_TIMEOUT
        ));
    }
}
