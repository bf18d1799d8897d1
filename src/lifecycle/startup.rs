//! Startup orchestration.
//!
//! # Order
//! ```text
//! bind listener
//!     → tracer provider, log shipper, metrics exporter
//!     → serve until shutdown
//!     → flush log shipper → shut down tracer provider
//! ```
//!
//! Any startup error is fatal. Binding comes first so a taken port fails
//! before any exporter starts.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncWrite;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_signal;
use crate::observability::init::{init_tracer, TelemetryError};
use crate::observability::logging::{CorrelatedLogger, LogShipper};
use crate::observability::metrics::init_metrics;
use crate::outcome::RandomOutcome;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Bind the configured address and serve until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(%signal, "Shutdown signal received");
        trigger.trigger();
    });

    serve(config, listener, shutdown, tokio::io::stdout()).await
}

/// Start telemetry and serve on `listener` until `shutdown` fires.
///
/// Correlated log entries are written to `log_writer`.
pub async fn serve<W>(
    config: ServiceConfig,
    listener: TcpListener,
    shutdown: Shutdown,
    log_writer: W,
) -> Result<(), StartupError>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let stopped = shutdown.wait();
    let (tracer, telemetry_guard) = init_tracer(&config);
    let (sink, shipper) = LogShipper::spawn(log_writer, config.logging.log_name.clone());

    if let Some(addr) = config.metrics.address {
        init_metrics(addr).map_err(TelemetryError::from)?;
    }

    let state = AppState {
        outcomes: Arc::new(RandomOutcome::new()),
        tracer,
        logger: CorrelatedLogger::new(config.service.project_id.as_str(), Arc::new(sink)),
    };

    tracing::info!(
        project_id = %config.service.project_id,
        log_name = %config.logging.log_name,
        "Telemetry pipeline ready"
    );

    let result = HttpServer::new(state)
        .run(listener, stopped)
        .await
        .map_err(StartupError::Serve);

    if let Err(e) = shipper.shutdown().await {
        tracing::warn!(error = %e, "Log shipper did not shut down cleanly");
    }
    drop(telemetry_guard);

    result
}
