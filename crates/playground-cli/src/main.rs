#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use axum::Router;
use playground_server::handler::{api_routes, not_found, routes};
use playground_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
use playground_server::service::ServiceState;
use tower_http::services::ServeDir;

use crate::config::Cli;
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "playground_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "playground_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "playground_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );

        if let Some(server_error) = error.downcast_ref::<ServerError>() {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error_code = server_error.error_code(),
                suggestion = server_error.suggestion(),
                "Recovery suggestion"
            );
        }
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.service).context("failed to create service state")?;
    let router = create_router(state, &cli);

    server::serve(router, &cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - upload API and static assets
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    let app = match cli.server.static_dir.as_deref() {
        Some(static_dir) => {
            let assets = ServeDir::new(static_dir).not_found_service(axum::routing::any(not_found));
            api_routes(&state).fallback_service(assets)
        }
        None => routes(&state),
    };

    app.with_state(state)
        .with_observability()
        .with_recovery(&cli.recovery)
}
