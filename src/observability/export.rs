//! Span export into the diagnostic stream.
//!
//! Finished spans are emitted as `tracing` events under the
//! `pingpong::spans` target, so they land on stderr next to the other
//! diagnostics. Stdout carries correlated log entries and nothing else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::trace::{SpanData, SpanExporter};

/// Exporter that reports each finished span as one diagnostic event.
#[derive(Debug, Default)]
pub struct DiagnosticSpanExporter {
    is_shutdown: AtomicBool,
}

impl SpanExporter for DiagnosticSpanExporter {
    async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Err(OTelSdkError::AlreadyShutdown);
        }

        for span in &batch {
            emit(span);
        }
        Ok(())
    }

    fn shutdown_with_timeout(&mut self, _timeout: Duration) -> OTelSdkResult {
        self.is_shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn emit(span: &SpanData) {
    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or_default();

    tracing::info!(
        target: "pingpong::spans",
        name = %span.name,
        kind = ?span.span_kind,
        trace_id = %span.span_context.trace_id(),
        span_id = %span.span_context.span_id(),
        parent_span_id = %span.parent_span_id,
        sampled = span.span_context.is_sampled(),
        status = ?span.status,
        duration_us = duration.as_micros() as u64,
        "Span finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::spans::RequestSpan;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::Context;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn finished_ping(fail: bool) -> (Vec<SpanData>, String) {
        let memory = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(memory.clone())
            .build();
        let tracer = provider.tracer("export-test");

        let span = RequestSpan::start(&tracer, &Context::new(), "ping", "/ping");
        if fail {
            span.set_error("zong");
        }
        let trace_id = span.trace_id().to_string();
        span.end();

        (memory.get_finished_spans().unwrap(), trace_id)
    }

    #[tokio::test]
    async fn test_spans_become_diagnostic_events() {
        let (batch, trace_id) = finished_ping(true);

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        DiagnosticSpanExporter::default().export(batch).await.unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["target"], "pingpong::spans");
        assert_eq!(event["fields"]["name"], "ping");
        assert_eq!(event["fields"]["trace_id"], trace_id.as_str());
        assert!(event["fields"]["status"]
            .as_str()
            .unwrap()
            .contains("zong"));
    }

    #[tokio::test]
    async fn test_export_after_shutdown_fails() {
        let (batch, _) = finished_ping(false);

        let mut exporter = DiagnosticSpanExporter::default();
        exporter.shutdown().unwrap();

        assert!(matches!(
            exporter.export(batch).await,
            Err(OTelSdkError::AlreadyShutdown)
        ));
    }
}
