//! Operational plumbing for the ethsig service.
//!
//! Covers the concerns around the verification core: configuration loading
//! and validation, logging and metrics setup, and shutdown signal handling.

pub mod config;
pub mod errors;
pub mod observability;
pub mod shutdown;

pub use config::{
    apply_env_overrides, load_config, load_config_from_str, validate_config, ServiceConfig,
};
pub use errors::ConfigError;
pub use observability::logging::{init_logging, LogFormat};
pub use observability::metrics::MetricsRegistry;
pub use shutdown::SignalHandler;
