#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use bluelena_server::handler::routes;
use bluelena_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use bluelena_server::service::ServiceState;
use bluelena_webhook::reqwest::ReqwestClient;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "bluelena_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "bluelena_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "bluelena_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli).await?;
    let router = create_router(state.clone(), &cli.recovery);

    server::serve(router, cli.server).await?;

    flush_queue(&state).await;
    Ok(())
}

/// Creates the service state with the reqwest webhook transport.
async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let webhook = ReqwestClient::new(cli.http.clone())
        .context("failed to create webhook client")?
        .into_service();

    ServiceState::from_config(&cli.service, webhook, cli.http.effective_timeout())
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, recovery: &RecoveryConfig) -> Router {
    routes()
        .with_state(state)
        .with_observability()
        .with_recovery(recovery)
}

/// Delivers whatever is still queued; scheduled drains do not survive the
/// process.
async fn flush_queue(state: &ServiceState) {
    let pending = state.queue.status().await.pending;
    if pending == 0 {
        return;
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        pending,
        "Draining sync queue before exit"
    );

    let report = state.queue.drain().await;

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        delivered = report.delivered,
        failed = report.failed,
        skipped = report.skipped,
        "Sync queue drained"
    );
}
