//! Configuration loading from the process environment.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{LogFormat, ServiceConfig, TraceExporterKind};
use crate::config::validation::{validate_config, ValidationError};

pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load and validate configuration using an arbitrary variable lookup.
///
/// Empty values are treated as unset.
pub fn load_from<F>(lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = ServiceConfig::default();

    config.service.project_id = get(PROJECT_ENV).ok_or(ConfigError::Missing(PROJECT_ENV))?;

    if let Some(port) = get("PORT") {
        let port: u16 = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            key: "PORT",
            value: port.clone(),
            reason: e.to_string(),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    if let Some(name) = get("SERVICE_NAME") {
        config.service.name = name;
    }
    config.service.cloud_run_service = get("K_SERVICE");
    config.service.cloud_run_revision = get("K_REVISION");

    if let Some(log_name) = get("LOG_NAME") {
        config.logging.log_name = log_name;
    }
    if let Some(format) = get("LOG_FORMAT") {
        config.logging.format = match format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: format,
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };
    }

    if let Some(exporter) = get("TRACE_EXPORTER") {
        config.tracing.exporter = match exporter.to_ascii_lowercase().as_str() {
            "log" => TraceExporterKind::Log,
            "none" => TraceExporterKind::None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "TRACE_EXPORTER",
                    value: exporter,
                    reason: "expected `log` or `none`".to_string(),
                })
            }
        };
    }
    if let Some(ratio) = get("TRACE_SAMPLE_RATIO") {
        config.tracing.sample_ratio =
            ratio.parse().map_err(|e: std::num::ParseFloatError| ConfigError::Invalid {
                key: "TRACE_SAMPLE_RATIO",
                value: ratio.clone(),
                reason: e.to_string(),
            })?;
    }

    if let Some(address) = get("METRICS_ADDRESS") {
        let addr: SocketAddr =
            address.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "METRICS_ADDRESS",
                value: address.clone(),
                reason: e.to_string(),
            })?;
        config.metrics.address = Some(addr);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
