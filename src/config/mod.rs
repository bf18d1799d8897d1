//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read variables, parse typed values)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → handed to telemetry and HTTP setup at startup
//! ```
//!
//! # Design Decisions
//! - Environment only; there is no config file
//! - All fields have defaults except the project id
//! - Validation separates parse errors from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from, load_from_env, ConfigError};
pub use schema::ServiceConfig;
pub use schema::{ListenerConfig, LogFormat, LoggingConfig, MetricsConfig, ServiceIdentity};
pub use schema::{TraceExporterKind, TracingConfig};
