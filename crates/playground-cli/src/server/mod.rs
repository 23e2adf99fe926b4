//! HTTP server startup with lifecycle management and graceful shutdown.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;

pub use self::error::{Result, ServerError};
use self::http_server::serve_http;
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;

/// Starts the HTTP server and runs it until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve(app: Router, config: &ServerConfig) -> Result<()> {
    serve_http(app, config).await
}
