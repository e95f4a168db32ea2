//! Service configuration: types, YAML loading, validation, env overrides.

mod env;
mod loader;
mod types;
mod validation;

pub use env::apply_env_overrides;
pub use loader::{load_config, load_config_from_str};
pub use types::{
    CorsConfig, ObservabilityConfig, OperationsConfig, RateLimitConfig, ServerConfig,
    ServiceConfig, VerificationConfig,
};
pub use validation::validate_config;
