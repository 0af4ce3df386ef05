//! HTTP server startup with graceful shutdown.

mod http_server;
mod lifecycle;
mod shutdown;

use std::io;

use axum::Router;
use http_server::serve_http;
use shutdown::shutdown_signal;

use crate::config::ServerConfig;

/// Serves `app` until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(app: Router, config: ServerConfig) -> io::Result<()> {
    serve_http(app, config).await
}
