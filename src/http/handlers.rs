//! Ping/pong endpoint handlers.
//!
//! Each request:
//! ```text
//! extract parent context → start span → draw outcome
//!     → correlated log entry (INFO or ERROR)
//!     → end span → 200 or 500 with a fixed body
//! ```
//!
//! The success body of each endpoint names the *other* endpoint
//! (`/ping` answers "pong", `/pong` answers "ping").

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::observability::logging::Severity;
use crate::observability::metrics;
use crate::observability::propagation::extract_parent;
use crate::observability::spans::RequestSpan;

/// The two randomized endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Ping,
    Pong,
}

impl Endpoint {
    /// Span name.
    pub const fn name(self) -> &'static str {
        match self {
            Endpoint::Ping => "ping",
            Endpoint::Pong => "pong",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Ping => "/ping",
            Endpoint::Pong => "/pong",
        }
    }

    pub const fn success_body(self) -> &'static str {
        match self {
            Endpoint::Ping => "pong",
            Endpoint::Pong => "ping",
        }
    }

    pub const fn failure_body(self) -> &'static str {
        match self {
            Endpoint::Ping => "zong",
            Endpoint::Pong => "zing",
        }
    }

    pub const fn success_message(self) -> &'static str {
        match self {
            Endpoint::Ping => "We ponged",
            Endpoint::Pong => "We pinged",
        }
    }

    pub const fn failure_message(self) -> &'static str {
        match self {
            Endpoint::Ping => "We zonged when we should've ponged",
            Endpoint::Pong => "Looks like we zinged when we should ping",
        }
    }
}

pub async fn ping(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dispatch(&state, Endpoint::Ping, &headers)
}

pub async fn pong(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dispatch(&state, Endpoint::Pong, &headers)
}

/// Handle one request for `endpoint`.
pub fn dispatch(state: &AppState, endpoint: Endpoint, headers: &HeaderMap) -> Response {
    let start_time = Instant::now();
    let parent = extract_parent(headers);
    let span = RequestSpan::start(&state.tracer, &parent, endpoint.name(), endpoint.path());

    let (status, body) = if state.outcomes.next_outcome() {
        state
            .logger
            .log(&span, Severity::Info, endpoint.success_message());
        (StatusCode::OK, endpoint.success_body())
    } else {
        span.set_error(endpoint.failure_body());
        state
            .logger
            .log(&span, Severity::Error, endpoint.failure_message());
        (StatusCode::INTERNAL_SERVER_ERROR, endpoint.failure_body())
    };

    tracing::debug!(
        endpoint = endpoint.name(),
        trace_id = %span.trace_id(),
        span_id = %span.span_id(),
        status = status.as_u16(),
        "Request dispatched"
    );

    span.end();
    metrics::record_request(endpoint.name(), status.as_u16(), start_time);

    (status, body).into_response()
}
