//! Configuration types for the verification service.

use serde::Deserialize;

/// Root configuration for the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Verification limits.
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Rate-limit configuration. Carried for deployments that front the
    /// service with a limiter; the service itself does not enforce it.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Operations configuration.
    #[serde(default)]
    pub operations: OperationsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "ServerConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Maximum accepted request body size in bytes. Default: 10MB.
    #[serde(default = "ServerConfig::default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            max_body_bytes: Self::default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    fn default_listen_addr() -> String {
        "127.0.0.1:5000".to_string()
    }

    const fn default_max_body_bytes() -> usize {
        10 * 1024 * 1024
    }
}

/// CORS configuration. One frontend origin is allowed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// The origin allowed to call the API.
    #[serde(default = "CorsConfig::default_allowed_origin")]
    pub allowed_origin: String,

    /// Whether credentialed requests are allowed. Default: true.
    #[serde(default = "CorsConfig::default_allow_credentials")]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: Self::default_allowed_origin(),
            allow_credentials: Self::default_allow_credentials(),
        }
    }
}

impl CorsConfig {
    fn default_allowed_origin() -> String {
        "http://localhost:5173".to_string()
    }

    const fn default_allow_credentials() -> bool {
        true
    }
}

/// Verification limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationConfig {
    /// Maximum message length, counted in Unicode scalar values.
    /// Default: 10,000.
    #[serde(default = "VerificationConfig::default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_message_chars: Self::default_max_message_chars(),
        }
    }
}

impl VerificationConfig {
    const fn default_max_message_chars() -> usize {
        10_000
    }
}

/// Rate-limit configuration. Not enforced by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Window size in milliseconds. Default: 15 minutes.
    #[serde(default = "RateLimitConfig::default_window_ms")]
    pub window_ms: u64,

    /// Maximum requests per window. Default: 100.
    #[serde(default = "RateLimitConfig::default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: Self::default_window_ms(),
            max_requests: Self::default_max_requests(),
        }
    }
}

impl RateLimitConfig {
    const fn default_window_ms() -> u64 {
        15 * 60 * 1000
    }

    const fn default_max_requests() -> u32 {
        100
    }
}

/// Observability configuration for logging and metrics.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Log level: trace, debug, info, warn, error. Default: info.
    #[serde(default = "ObservabilityConfig::default_log_level")]
    pub log_level: String,

    /// Log format: json or pretty. Default: json.
    #[serde(default = "ObservabilityConfig::default_log_format")]
    pub log_format: String,

    /// Whether the Prometheus metrics endpoint is enabled. Default: true.
    #[serde(default = "ObservabilityConfig::default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            log_format: Self::default_log_format(),
            metrics_enabled: Self::default_metrics_enabled(),
        }
    }
}

impl ObservabilityConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }

    fn default_log_format() -> String {
        "json".to_string()
    }

    const fn default_metrics_enabled() -> bool {
        true
    }
}

/// Operations configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationsConfig {
    /// Shutdown timeout in seconds. Default: 30.
    #[serde(default = "OperationsConfig::default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: Self::default_shutdown_timeout_secs(),
        }
    }
}

impl OperationsConfig {
    const fn default_shutdown_timeout_secs() -> u64 {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:5000");
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_default_cors_config() {
        let config = CorsConfig::default();
        assert_eq!(config.allowed_origin, "http://localhost:5173");
        assert!(config.allow_credentials);
    }

    #[test]
    fn test_default_verification_limit() {
        assert_eq!(VerificationConfig::default().max_message_chars, 10_000);
    }

    #[test]
    fn test_default_rate_limit_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.window_ms, 900_000);
        assert_eq!(config.max_requests, 100);
    }

    #[test]
    fn test_default_observability_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, "json");
        assert!(config.metrics_enabled);
    }
}
