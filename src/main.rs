//! pingpong service entry point.
//!
//! ```text
//!     GET /ping ──┐                       ┌──▶ 200 "pong" │ 500 "zong"
//!                 ├─▶ span ─▶ coin flip ──┤
//!     GET /pong ──┘        │              └──▶ 200 "ping" │ 500 "zing"
//!                          ▼
//!              correlated log entry (stdout)
//!              span export (batch processor, stderr diagnostics)
//! ```
//!
//! Configuration comes from the environment; `GOOGLE_CLOUD_PROJECT` is
//! required. Startup failures exit non-zero before any request is served.

use std::process::ExitCode;

use pingpong::config::load_from_env;
use pingpong::lifecycle::startup;
use pingpong::observability::init_subscriber;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pingpong: configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_subscriber(&config.logging) {
        eprintln!("pingpong: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        project_id = %config.service.project_id,
        "pingpong starting"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
