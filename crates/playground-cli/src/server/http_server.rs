//! HTTP server startup.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use super::lifecycle::serve_with_shutdown;
use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::{Result, ServerError, shutdown_signal};

/// Starts an HTTP server with graceful shutdown.
///
/// Binds to the configured address and serves requests until a shutdown
/// signal is received.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(app: Router, server_config: &ServerConfig) -> Result<()> {
    let server_addr = server_config.server_addr();

    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                "Server is ready and listening for connections"
            );

            listener
        }
        Err(listener_err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                error = %listener_err,
                "Failed to bind to address"
            );

            return Err(ServerError::bind_error(server_addr, listener_err));
        }
    };

    let shutdown_signal = shutdown_signal(server_config.shutdown_timeout());
    serve_with_shutdown(server_config, || async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
    })
    .await
    .map_err(ServerError::Runtime)
}
