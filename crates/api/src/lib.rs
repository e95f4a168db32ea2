//! HTTP API for the signature verification service.
//!
//! A small REST surface in front of [`ethsig_verify`]:
//!
//! - `POST /verify-signature` — verify a personal-sign signature
//! - `GET /health` — liveness probe
//! - `GET /api` — capability description
//! - `GET /metrics` — Prometheus exposition (when enabled)
//!
//! The service is a plain [`tower::Service`] served over hyper, so tests can
//! drive it without opening a socket.
//!
//! # Example
//!
//! ```rust,no_run
//! use ethsig_api::{start_server, ApiServerConfig};
//! use ethsig_operations::MetricsRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let metrics = Arc::new(MetricsRegistry::new());
//!     let mut handle = start_server(ApiServerConfig::default(), metrics)
//!         .await
//!         .unwrap();
//!     handle.stopped().await;
//! }
//! ```

pub mod cors;
pub mod error;
mod handlers;
pub mod health;
pub mod server;
pub mod service;

pub use cors::CorsPolicy;
pub use error::{codes, ApiError, ErrorBody};
pub use health::{HealthStatus, SERVICE_NAME, SERVICE_VERSION};
pub use server::{start_server, ApiServerConfig, ServerError, ServerHandle};
pub use service::ApiService;
