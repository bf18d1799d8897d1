//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Per request (http::handlers):
//!     → propagation.rs (parent context from traceparent)
//!     → spans.rs (one server span, ended exactly once)
//!     → logging.rs (one entry carrying that span's trace/span ids)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Process wide (init.rs):
//!     → tracing subscriber for diagnostics
//!     → tracer provider with batch export (export.rs, spans as diagnostics)
//! ```
//!
//! # Design Decisions
//! - Correlated entries (stdout) are separate from diagnostics and exported
//!   spans (stderr)
//! - The tracer is passed explicitly, never looked up from a global
//! - Telemetry delivery never blocks a request

pub mod export;
pub mod init;
pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod spans;

pub use export::DiagnosticSpanExporter;
pub use init::{init_subscriber, init_tracer, TelemetryError, TelemetryGuard};
pub use logging::{CorrelatedLogger, LogEntry, LogShipper, LogSink, Severity, SinkError};
pub use spans::RequestSpan;
