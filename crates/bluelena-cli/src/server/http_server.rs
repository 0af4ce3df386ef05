//! HTTP server startup and lifecycle management.

use std::future::IntoFuture;
use std::io;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::lifecycle::serve_with_shutdown;
use super::shutdown_signal;
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// In-flight requests get `shutdown_timeout` to finish once the signal
/// arrives; whatever is still running after that is dropped.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> io::Result<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let shutdown_timeout = server_config.shutdown_timeout();
    serve_with_shutdown(&server_config, || async move {
        let shutdown_started = Arc::new(Notify::new());
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown_started.clone()))
            .into_future();

        let deadline = async {
            shutdown_started.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        };

        tokio::select! {
            result = server => result,
            () = deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Graceful shutdown timed out, dropping open connections"
                );
                Ok(())
            }
        }
    })
    .await
}
