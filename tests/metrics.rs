//! Request metrics recorded by the dispatcher.

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;
use pingpong::outcome::{FixedOutcome, ScriptedOutcome};

mod common;

use common::Harness;

#[tokio::test]
async fn test_failed_ping_is_counted_and_timed() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let harness = Harness::new(FixedOutcome(false));
    let (status, _) = harness.get("/ping").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let rendered = handle.render();
    assert!(
        rendered.contains(r#"pingpong_requests_total{endpoint="ping",status="500"} 1"#),
        "counter missing from:\n{}",
        rendered
    );
    assert!(
        rendered.contains(r#"pingpong_request_duration_seconds_count{endpoint="ping"} 1"#),
        "histogram missing from:\n{}",
        rendered
    );
}

#[tokio::test]
async fn test_statuses_are_counted_per_endpoint() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let harness = Harness::new(ScriptedOutcome::new(vec![true, false, true]));
    for _ in 0..3 {
        harness.get("/pong").await;
    }
    // Unrouted requests never reach the dispatcher.
    harness.get("/zing").await;

    let rendered = handle.render();
    assert!(rendered.contains(r#"pingpong_requests_total{endpoint="pong",status="200"} 2"#));
    assert!(rendered.contains(r#"pingpong_requests_total{endpoint="pong",status="500"} 1"#));
    assert!(!rendered.contains(r#"endpoint="ping""#));
}
