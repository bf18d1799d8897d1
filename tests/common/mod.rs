//! Shared test doubles and harness for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use pingpong::http::{build_router, AppState};
use pingpong::observability::{CorrelatedLogger, LogEntry, LogSink, SinkError};
use pingpong::outcome::OutcomeSource;
use tower::ServiceExt;

pub const PROJECT_ID: &str = "test-project";

/// Log sink that keeps every submitted entry.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn submit(&self, entry: LogEntry) -> Result<(), SinkError> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

/// Router wired to in-memory collaborators.
pub struct Harness {
    pub router: Router,
    pub sink: Arc<RecordingSink>,
    pub exporter: InMemorySpanExporter,
    _provider: SdkTracerProvider,
}

impl Harness {
    pub fn new(outcomes: impl OutcomeSource + 'static) -> Self {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let sink = Arc::new(RecordingSink::default());

        let state = AppState {
            outcomes: Arc::new(outcomes),
            tracer: provider.tracer("pingpong-test"),
            logger: CorrelatedLogger::new(PROJECT_ID, sink.clone()),
        };

        Self {
            router: build_router(state),
            sink,
            exporter,
            _provider: provider,
        }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub fn spans(&self) -> Vec<SpanData> {
        self.exporter.get_finished_spans().unwrap()
    }
}

/// Check that `entry` points at `span`.
pub fn assert_correlated(entry: &LogEntry, span: &SpanData) {
    assert_eq!(
        entry.trace,
        format!(
            "projects/{}/traces/{}",
            PROJECT_ID,
            span.span_context.trace_id()
        )
    );
    assert_eq!(entry.span_id, span.span_context.span_id().to_string());
}
