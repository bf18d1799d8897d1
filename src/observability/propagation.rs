//! W3C Trace Context extraction from HTTP request headers.

use axum::http::HeaderMap;
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

/// Extract the caller's trace context from `traceparent`/`tracestate`.
///
/// Starts from an empty context rather than the ambient one, so a request
/// without trace headers always begins a new trace. Malformed headers are
/// ignored the same way.
pub fn extract_parent(headers: &HeaderMap) -> Context {
    TraceContextPropagator::new().extract_with_context(&Context::new(), &HeaderExtractor(headers))
}

/// Extractor for reading headers from an axum `HeaderMap`.
struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use opentelemetry::trace::{SpanId, TraceContextExt, TraceId};

    #[test]
    fn test_extracts_traceparent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "traceparent",
            HeaderValue::from_static("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
        );

        let cx = extract_parent(&headers);
        let span = cx.span();
        let parent = span.span_context();
        assert!(parent.is_valid());
        assert!(parent.is_remote());
        assert!(parent.is_sampled());
        assert_eq!(
            parent.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
        assert_eq!(parent.span_id(), SpanId::from_hex("00f067aa0ba902b7").unwrap());
    }

    #[test]
    fn test_missing_or_malformed_header_yields_no_parent() {
        assert!(!extract_parent(&HeaderMap::new()).has_active_span());

        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static("garbage"));
        assert!(!extract_parent(&headers).span().span_context().is_valid());
    }
}
