//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the signup route
//! - Wire up middleware (request ID, tracing, body limit)
//! - Hand each request to the relay
//! - Serve until the shutdown signal fires

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::relay::{InboundBody, RelayError, SignupRelay};

/// The one path the relay answers on.
pub const SIGNUP_PATH: &str = "/api/signup";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<SignupRelay>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let relay = Arc::new(SignupRelay::new(&config.upstream)?);
        let router = Self::build_router(&config, AppState { relay });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route(SIGNUP_PATH, any(signup_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            timeout_ms = self.config.upstream.timeout_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Signup handler: every method lands here, the relay decides.
async fn signup_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = tracing::info_span!("signup", request_id = %request_id(&headers), method = %method);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    state
        .relay
        .handle(&method, InboundBody::from_bytes(content_type, &body))
        .instrument(span)
        .await
        .into_response()
}
