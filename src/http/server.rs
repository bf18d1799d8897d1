//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router with the ping/pong handlers
//! - Wire up middleware (request tracing, request ID)
//! - Serve on a bound listener until the shutdown signal fires

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use opentelemetry_sdk::trace::SdkTracer;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::handlers;
use crate::observability::logging::CorrelatedLogger;
use crate::outcome::OutcomeSource;

/// Application state injected into handlers.
///
/// Everything here is process-scoped and shared read-only across requests;
/// request-scoped values (the span, its context) live on the handler's stack.
#[derive(Clone)]
pub struct AppState {
    pub outcomes: Arc<dyn OutcomeSource>,
    pub tracer: SdkTracer,
    pub logger: CorrelatedLogger,
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/pong", get(handlers::pong))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// HTTP server for the ping/pong service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` completes. In-flight requests are allowed to finish.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
