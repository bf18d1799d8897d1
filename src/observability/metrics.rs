//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pingpong_requests_total` (counter): requests by endpoint, status
//! - `pingpong_request_duration_seconds` (histogram): handling latency by endpoint
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - The Prometheus exporter is optional and serves its own listener

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "pingpong_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("pingpong_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_record_request_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            record_request("pong", 200, Instant::now());
            record_request("pong", 200, Instant::now());
            record_request("pong", 500, Instant::now());
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"pingpong_requests_total{endpoint="pong",status="200"} 2"#));
        assert!(rendered.contains(r#"pingpong_requests_total{endpoint="pong",status="500"} 1"#));
        assert!(rendered.contains(r#"pingpong_request_duration_seconds_count{endpoint="pong"} 3"#));
    }
}
