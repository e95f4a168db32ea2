//! Server bootstrap and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;

use ethsig_operations::{MetricsRegistry, ServiceConfig};

use crate::service::ApiService;

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
    /// Maximum message length, counted in Unicode scalar values.
    pub max_message_chars: usize,
    /// Origin allowed by the CORS policy.
    pub allowed_origin: String,
    /// Whether credentialed CORS requests are allowed.
    pub allow_credentials: bool,
    /// Whether `GET /metrics` is served.
    pub metrics_enabled: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_body_bytes: 10 * 1024 * 1024,
            max_message_chars: 10_000,
            allowed_origin: "http://localhost:5173".to_string(),
            allow_credentials: true,
            metrics_enabled: true,
        }
    }
}

impl ApiServerConfig {
    /// Derive a server configuration from the service-level config.
    pub fn from_service_config(config: &ServiceConfig) -> Result<Self, ServerError> {
        let listen_addr = config
            .server
            .listen_addr
            .parse()
            .map_err(|_| ServerError::InvalidListenAddr(config.server.listen_addr.clone()))?;

        Ok(Self {
            listen_addr,
            max_body_bytes: config.server.max_body_bytes,
            max_message_chars: config.verification.max_message_chars,
            allowed_origin: config.cors.allowed_origin.clone(),
            allow_credentials: config.cors.allow_credentials,
            metrics_enabled: config.observability.metrics_enabled,
        })
    }
}

/// Errors from server startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address: {0}")]
    InvalidListenAddr(String),

    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Handle to a running API server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    stop_tx: watch::Sender<bool>,
    done_rx: watch::Receiver<bool>,
}

impl ServerHandle {
    /// The address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting new connections. In-flight requests finish on their
    /// own tasks.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Wait until the accept loop has exited.
    pub async fn stopped(&mut self) {
        while !*self.done_rx.borrow() {
            if self.done_rx.changed().await.is_err() {
                break;
            }
        }
    }
}

/// Bind and start the API server.
pub async fn start_server(
    config: ApiServerConfig,
    metrics: Arc<MetricsRegistry>,
) -> Result<ServerHandle, ServerError> {
    let service = ApiService::build(&config, metrics)?;

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.listen_addr,
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
        addr: config.listen_addr,
        source,
    })?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let (done_tx, done_rx) = watch::channel(false);

    tokio::spawn(accept_loop(listener, service, stop_rx, done_tx));
    tracing::info!("API server listening on {}", local_addr);

    Ok(ServerHandle {
        local_addr,
        stop_tx,
        done_rx,
    })
}

async fn accept_loop(
    listener: TcpListener,
    service: ApiService,
    mut stop_rx: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let io = TokioIo::new(stream);
                        let connection_service = TowerToHyperService::new(service.clone());
                        tokio::spawn(async move {
                            if let Err(err) = auto::Builder::new(TokioExecutor::new())
                                .serve_connection(io, connection_service)
                                .await
                            {
                                tracing::debug!("connection from {} ended with error: {}", peer, err);
                            }
                        });
                    }
                    Err(err) => {
                        tracing::warn!("failed to accept connection: {}", err);
                    }
                }
            }
        }
    }
    let _ = done_tx.send(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_stop() {
        let config = ApiServerConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..Default::default()
        };
        let metrics = Arc::new(MetricsRegistry::new());

        let mut handle = start_server(config, metrics).await.unwrap();
        assert_ne!(handle.local_addr().port(), 0);

        handle.stop();
        handle.stopped().await;
    }

    #[test]
    fn test_from_service_config() {
        let mut service_config = ServiceConfig::default();
        service_config.server.listen_addr = "0.0.0.0:8080".to_string();
        service_config.cors.allowed_origin = "https://app.example.com".to_string();
        service_config.observability.metrics_enabled = false;

        let config = ApiServerConfig::from_service_config(&service_config).unwrap();
        assert_eq!(config.listen_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.allowed_origin, "https://app.example.com");
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_invalid_listen_addr_rejected() {
        let mut service_config = ServiceConfig::default();
        service_config.server.listen_addr = "nonsense".to_string();

        let err = ApiServerConfig::from_service_config(&service_config).unwrap_err();
        assert!(matches!(err, ServerError::InvalidListenAddr(_)));
    }
}
