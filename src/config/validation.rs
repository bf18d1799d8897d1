//! Configuration validation.
//!
//! Returns every problem found, not just the first, so a misconfigured
//! deployment can be fixed in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("project id must not be empty")]
    EmptyProjectId,

    #[error("project id {0:?} must not contain '/'")]
    MalformedProjectId(String),

    #[error("bind address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("metrics address must differ from the listener address")]
    MetricsAddressConflict,

    #[error("sample ratio {0} must be within 0.0..=1.0")]
    SampleRatio(f64),

    #[error("log name must not be empty")]
    EmptyLogName,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let project = &config.service.project_id;
    if project.trim().is_empty() {
        errors.push(ValidationError::EmptyProjectId);
    } else if project.contains('/') {
        errors.push(ValidationError::MalformedProjectId(project.clone()));
    }

    let bind = config.listener.bind_address.parse::<SocketAddr>();
    if bind.is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let (Some(metrics), Ok(bind)) = (config.metrics.address, &bind) {
        if metrics.port() == bind.port() {
            errors.push(ValidationError::MetricsAddressConflict);
        }
    }

    let ratio = config.tracing.sample_ratio;
    if !(0.0..=1.0).contains(&ratio) {
        errors.push(ValidationError::SampleRatio(ratio));
    }

    if config.logging.log_name.trim().is_empty() {
        errors.push(ValidationError::EmptyLogName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
