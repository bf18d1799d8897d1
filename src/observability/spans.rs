//! Per-request spans.
//!
//! A [`RequestSpan`] owns the OpenTelemetry context for exactly one request.
//! It is a plain local value threaded through the handler, never stored on
//! shared state, and it ends its span exactly once: either explicitly through
//! [`RequestSpan::end`] or when dropped (a cancelled request future).

use opentelemetry::trace::{
    SpanContext, SpanId, SpanKind, Status, TraceContextExt, TraceId, Tracer as _,
};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;
use opentelemetry_semantic_conventions::trace::HTTP_ROUTE;

/// The span opened for one request, together with the context carrying it.
#[derive(Debug)]
pub struct RequestSpan {
    cx: Context,
    span_context: SpanContext,
    ended: bool,
}

impl RequestSpan {
    /// Start a server span named `operation` as a child of whatever span
    /// `parent` carries (usually a remote parent from `traceparent`).
    pub fn start(
        tracer: &SdkTracer,
        parent: &Context,
        operation: &'static str,
        route: &'static str,
    ) -> Self {
        let span = tracer
            .span_builder(operation)
            .with_kind(SpanKind::Server)
            .with_attributes([KeyValue::new(HTTP_ROUTE, route)])
            .start_with_context(tracer, parent);
        let cx = parent.with_span(span);
        let span_context = cx.span().span_context().clone();

        Self {
            cx,
            span_context,
            ended: false,
        }
    }

    /// Context carrying this span, for nested operations.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn span_context(&self) -> &SpanContext {
        &self.span_context
    }

    pub fn trace_id(&self) -> TraceId {
        self.span_context.trace_id()
    }

    pub fn span_id(&self) -> SpanId {
        self.span_context.span_id()
    }

    pub fn is_sampled(&self) -> bool {
        self.span_context.is_sampled()
    }

    /// Mark the span as failed.
    pub fn set_error(&self, description: &'static str) {
        self.cx.span().set_status(Status::error(description));
    }

    /// End the span now.
    pub fn end(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if !self.ended {
            self.ended = true;
            self.cx.span().end();
        }
    }
}

impl Drop for RequestSpan {
    fn drop(&mut self) {
        self.finish();
    }
}
