//! Sync queue inspection handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use bluelena_sync::{DrainReport, QueueStatus, SyncQueue};

use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for queue operations.
const TRACING_TARGET: &str = "bluelena_server::handler::queue";

/// Returns the number of pending requests and the next drain time.
#[tracing::instrument(skip_all)]
async fn queue_status(State(queue): State<SyncQueue>) -> Result<(StatusCode, Json<QueueStatus>)> {
    Ok((StatusCode::OK, Json(queue.status().await)))
}

/// Drains the queue now instead of waiting for the scheduled drain.
#[tracing::instrument(skip_all)]
async fn drain_queue(State(queue): State<SyncQueue>) -> Result<(StatusCode, Json<DrainReport>)> {
    let report = queue.drain().await;

    tracing::info!(
        target: TRACING_TARGET,
        attempted = report.attempted,
        delivered = report.delivered,
        failed = report.failed,
        skipped = report.skipped,
        "Manual drain finished"
    );

    Ok((StatusCode::OK, Json(report)))
}

/// Returns a [`Router`] with the queue routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/queue", get(queue_status))
        .route("/queue/drain", post(drain_queue))
}
