//! Prometheus-compatible metrics collection.
//!
//! This module provides a metrics registry for tracking request volume and
//! verification outcomes, exported in Prometheus text format.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

/// Labels for the HTTP request counter.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    /// Matched route (a fixed set, so label cardinality stays bounded).
    pub route: String,
    /// Response status code.
    pub status: u32,
}

/// Labels for the verification counter.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct VerificationLabels {
    pub outcome: VerificationOutcomeLabel,
}

/// Outcome dimension for verification counters.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum VerificationOutcomeLabel {
    Valid,
    Failed,
}

/// Service-level metrics.
pub struct ServiceMetrics {
    /// HTTP requests served, by route and status.
    pub http_requests: Family<RequestLabels, Counter>,
    /// Signature verifications performed, by outcome.
    pub verifications: Family<VerificationLabels, Counter>,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new set of service metrics.
    pub fn new() -> Self {
        Self {
            http_requests: Family::default(),
            verifications: Family::default(),
        }
    }

    /// Record a served HTTP request.
    pub fn record_request(&self, route: &str, status: u16) {
        self.http_requests
            .get_or_create(&RequestLabels {
                route: route.to_string(),
                status: u32::from(status),
            })
            .inc();
    }

    /// Record a verification outcome.
    pub fn record_verification(&self, valid: bool) {
        let outcome = if valid {
            VerificationOutcomeLabel::Valid
        } else {
            VerificationOutcomeLabel::Failed
        };
        self.verifications
            .get_or_create(&VerificationLabels { outcome })
            .inc();
    }
}

/// Central metrics registry for the service.
pub struct MetricsRegistry {
    registry: Registry,
    /// Service-level metrics.
    pub service: ServiceMetrics,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    /// Create a new metrics registry with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let service = ServiceMetrics::new();

        registry.register(
            "ethsig_http_requests",
            "HTTP requests served, by route and status",
            service.http_requests.clone(),
        );

        registry.register(
            "ethsig_verifications",
            "Signature verifications performed, by outcome",
            service.verifications.clone(),
        );

        Self { registry, service }
    }

    /// Encode all metrics in Prometheus text format.
    pub fn encode_prometheus(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            return String::from("# Error encoding metrics\n");
        }
        buffer
    }

    /// Get a reference to the underlying registry for custom metric registration.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get a mutable reference to the underlying registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}
