//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, request tracing)
//!     → handlers.rs (span, outcome, correlated log entry)
//!     → 200/500 with a fixed body
//! ```

pub mod handlers;
pub mod server;

pub use handlers::Endpoint;
pub use server::{build_router, AppState, HttpServer};
