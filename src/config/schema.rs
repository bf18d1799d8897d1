//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! Every section has a `Default`; the loader overrides fields from the
//! environment.

use std::net::SocketAddr;

/// Root configuration for the ping/pong service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Cloud project and service identity.
    pub service: ServiceIdentity,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Distributed tracing settings.
    pub tracing: TracingConfig,

    /// Metrics settings.
    pub metrics: MetricsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Who this process is, as reported to the telemetry backends.
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    /// Project scope used in trace references (`projects/<id>/traces/...`).
    pub project_id: String,

    /// `service.name` resource attribute.
    pub name: String,

    /// Cloud Run service name, when running on Cloud Run.
    pub cloud_run_service: Option<String>,

    /// Cloud Run revision, when running on Cloud Run.
    pub cloud_run_revision: Option<String>,
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            name: "pingpong-service".to_string(),
            cloud_run_service: None,
            cloud_run_revision: None,
        }
    }
}

/// Output format for diagnostic logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log name label stamped on every correlated entry.
    pub log_name: String,

    /// Diagnostic log format.
    pub format: LogFormat,

    /// Fallback filter directives when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_name: "pingpong".to_string(),
            format: LogFormat::Json,
            default_filter: "pingpong=info,tower_http=info".to_string(),
        }
    }
}

/// Where finished spans are shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceExporterKind {
    /// Diagnostic events on stderr.
    Log,
    None,
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Span exporter.
    pub exporter: TraceExporterKind,

    /// Fraction of root traces to sample (parent decision wins otherwise).
    pub sample_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            exporter: TraceExporterKind::Log,
            sample_ratio: 1.0,
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    /// Prometheus endpoint bind address. Disabled when unset.
    pub address: Option<SocketAddr>,
}
