//! The HTTP service: routing and response dispatch.

use http::{Method, Request, Response};
use http_body_util::Full;
use hyper::body::Bytes;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

use ethsig_operations::MetricsRegistry;

use crate::cors::CorsPolicy;
use crate::error::ApiError;
use crate::handlers;
use crate::server::{ApiServerConfig, ServerError};

/// Shared state behind the service.
pub struct ApiState {
    pub(crate) cors: CorsPolicy,
    pub(crate) max_body_bytes: usize,
    pub(crate) max_message_chars: usize,
    pub(crate) metrics_enabled: bool,
    pub(crate) metrics: Arc<MetricsRegistry>,
}

/// The HTTP service. Cloning is cheap; all clones share state.
#[derive(Clone)]
pub struct ApiService {
    state: Arc<ApiState>,
}

impl ApiService {
    /// Build a service from server configuration.
    pub fn build(
        config: &ApiServerConfig,
        metrics: Arc<MetricsRegistry>,
    ) -> Result<Self, ServerError> {
        let cors = CorsPolicy::new(&config.allowed_origin, config.allow_credentials)
            .map_err(|_| ServerError::InvalidOrigin(config.allowed_origin.clone()))?;

        Ok(Self {
            state: Arc::new(ApiState {
                cors,
                max_body_bytes: config.max_body_bytes,
                max_message_chars: config.max_message_chars,
                metrics_enabled: config.metrics_enabled,
                metrics,
            }),
        })
    }
}

/// Route a request and produce its response.
async fn dispatch<B>(state: Arc<ApiState>, req: Request<B>) -> Response<Full<Bytes>>
where
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // Route labels for metrics come from this fixed set, never from the
    // request path, so label cardinality stays bounded.
    let (route, mut response) = match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => ("preflight", state.cors.preflight()),
        (&Method::POST, "/verify-signature") => (
            "/verify-signature",
            handlers::verify_signature(&state, req).await,
        ),
        (&Method::GET, "/health") => ("/health", handlers::health()),
        (&Method::GET, "/api") => ("/api", handlers::api_info()),
        (&Method::GET, "/metrics") if state.metrics_enabled => {
            ("/metrics", handlers::metrics(&state))
        }
        _ => ("unmatched", handlers::error_response(&ApiError::NotFound)),
    };

    state.cors.apply(response.headers_mut());
    state
        .metrics
        .service
        .record_request(route, response.status().as_u16());
    response
}

impl<B> Service<Request<B>> for ApiService
where
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let state = Arc::clone(&self.state);
        Box::pin(async move { Ok(dispatch(state, req).await) })
    }
}
