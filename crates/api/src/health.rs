//! Liveness reporting and the static capability description.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ethsig_verify::{rfc3339_timestamp, VERIFICATION_METHOD};

/// Service name reported by `GET /api`.
pub const SERVICE_NAME: &str = "ethsig verification API";

/// Service version reported by `/health` and `/api`.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health status returned by the liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

impl HealthStatus {
    /// Snapshot a healthy status.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: rfc3339_timestamp(),
            version: SERVICE_VERSION.to_string(),
        }
    }
}

/// Static capability description returned by `GET /api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
    pub supported_formats: Vec<String>,
    pub timestamp: String,
}

impl ApiInfo {
    /// Snapshot the current capability description.
    pub fn current() -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(
            "POST /verify-signature".to_string(),
            "Verify Ethereum message signatures".to_string(),
        );
        endpoints.insert(
            "GET /health".to_string(),
            "Health check endpoint".to_string(),
        );
        endpoints.insert("GET /api".to_string(), "API information".to_string());

        Self {
            name: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            endpoints,
            supported_formats: vec![VERIFICATION_METHOD.to_string()],
            timestamp: rfc3339_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_status() {
        let status = HealthStatus::healthy();
        assert_eq!(status.status, "healthy");
        assert_eq!(status.version, SERVICE_VERSION);
        assert!(!status.timestamp.is_empty());
    }

    #[test]
    fn test_api_info_lists_endpoints() {
        let info = ApiInfo::current();
        assert!(info.endpoints.contains_key("POST /verify-signature"));
        assert!(info.endpoints.contains_key("GET /health"));
        assert!(info.endpoints.contains_key("GET /api"));
        assert_eq!(info.supported_formats, vec![VERIFICATION_METHOD]);
    }
}
