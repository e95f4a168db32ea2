//! Environment variable overrides.
//!
//! Container deployments configure the service through `PORT` and
//! `FRONTEND_URL`, alongside the usual `LOG_LEVEL` / `LOG_FORMAT`.

use crate::config::types::ServiceConfig;

/// Apply environment overrides to a loaded configuration.
///
/// `PORT` rebinds only the port of `server.listen_addr`; the host part is
/// kept. Unparseable values are ignored.
pub fn apply_env_overrides(config: &mut ServiceConfig) {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

fn apply_overrides_from(config: &mut ServiceConfig, get: impl Fn(&str) -> Option<String>) {
    if let Some(port) = get("PORT").and_then(|v| v.parse::<u16>().ok()) {
        let host = config
            .server
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        config.server.listen_addr = format!("{host}:{port}");
    }

    if let Some(origin) = get("FRONTEND_URL") {
        config.cors.allowed_origin = origin;
    }

    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    if let Some(format) = get("LOG_FORMAT") {
        config.observability.log_format = format;
    }
}
