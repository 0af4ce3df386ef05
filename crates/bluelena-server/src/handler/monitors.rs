//! Liveness handler.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use jiff::Timestamp;

use super::response::Health;
use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "bluelena_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status() -> Result<(StatusCode, Json<Health>)> {
    tracing::trace!(target: TRACING_TARGET, "Health status check requested");

    let response = Health {
        is_healthy: true,
        version: env!("CARGO_PKG_VERSION").to_owned(),
        checked_at: Timestamp::now(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn test_health_status() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let health = response.json::<Health>();
        assert!(health.is_healthy);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));

        let age = Timestamp::now().duration_since(health.checked_at);
        assert!(age.as_secs() < 60);

        Ok(())
    }
}
