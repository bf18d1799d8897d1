//! Telemetry initialization.
//!
//! Sets up:
//! - the `tracing` subscriber for diagnostics (stderr, JSON or pretty)
//! - the OpenTelemetry tracer provider (batch export, parent-based sampling)
//!   whose spans end up on the same stderr diagnostic stream
//! - the resource describing this service and its platform

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig, ServiceConfig, ServiceIdentity, TraceExporterKind};
use crate::observability::export::DiagnosticSpanExporter;

const CLOUD_PROVIDER: &str = "cloud.provider";
const CLOUD_PLATFORM: &str = "cloud.platform";
const CLOUD_ACCOUNT_ID: &str = "cloud.account.id";
const FAAS_NAME: &str = "faas.name";
const FAAS_VERSION: &str = "faas.version";

const TRACER_NAME: &str = "pingpong";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Guard that shuts the tracer provider down, flushing pending spans.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shutdown tracer provider: {:?}", e);
            }
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Diagnostics go to stderr; stdout is reserved for correlated entries.
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}

/// Describe this service: name, version, and platform attributes.
pub fn build_resource(identity: &ServiceIdentity) -> Resource {
    let mut attributes = vec![
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(CLOUD_PROVIDER, "gcp"),
        KeyValue::new(CLOUD_ACCOUNT_ID, identity.project_id.clone()),
    ];

    if let Some(service) = &identity.cloud_run_service {
        attributes.push(KeyValue::new(CLOUD_PLATFORM, "gcp_cloud_run"));
        attributes.push(KeyValue::new(FAAS_NAME, service.clone()));
        if let Some(revision) = &identity.cloud_run_revision {
            attributes.push(KeyValue::new(FAAS_VERSION, revision.clone()));
        }
    }

    Resource::builder()
        .with_service_name(identity.name.clone())
        .with_attributes(attributes)
        .build()
}

fn build_sampler(ratio: f64) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };
    Sampler::ParentBased(Box::new(root))
}

/// Build the tracer provider and the tracer used for request spans.
///
/// The tracer is handed to the HTTP layer directly; nothing is registered
/// globally.
pub fn init_tracer(config: &ServiceConfig) -> (SdkTracer, TelemetryGuard) {
    let mut builder = SdkTracerProvider::builder()
        .with_resource(build_resource(&config.service))
        .with_sampler(build_sampler(config.tracing.sample_ratio));

    match config.tracing.exporter {
        TraceExporterKind::Log => {
            builder = builder.with_batch_exporter(DiagnosticSpanExporter::default());
        }
        TraceExporterKind::None => {}
    }

    let provider = builder.build();
    let tracer = provider.tracer(TRACER_NAME);

    tracing::info!(
        service.name = %config.service.name,
        exporter = ?config.tracing.exporter,
        sample_ratio = config.tracing.sample_ratio,
        "Tracer provider initialized"
    );

    (
        tracer,
        TelemetryGuard {
            tracer_provider: Some(provider),
        },
    )
}
