//! Ping/pong demonstration service.
//!
//! Two endpoints that succeed or fail at random, each request producing one
//! trace span and one structured log entry correlated to it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod outcome;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use outcome::{OutcomeSource, RandomOutcome};
