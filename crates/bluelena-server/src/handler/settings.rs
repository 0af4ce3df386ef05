//! Webhook settings handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use bluelena_core::{MemorySettingsStore, Settings};

use super::request::UpdateSettings;
use super::response::SettingsView;
use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for settings operations.
const TRACING_TARGET: &str = "bluelena_server::handler::settings";

/// Returns the current settings; the token is reduced to a flag.
#[tracing::instrument(skip_all)]
async fn read_settings(
    State(settings): State<MemorySettingsStore>,
) -> Result<(StatusCode, Json<SettingsView>)> {
    let current = Settings::load(&settings).await?;
    Ok((StatusCode::OK, Json(current.into())))
}

/// Replaces the settings.
#[tracing::instrument(skip_all)]
async fn update_settings(
    State(settings): State<MemorySettingsStore>,
    Json(request): Json<UpdateSettings>,
) -> Result<(StatusCode, Json<SettingsView>)> {
    request.validate()?;

    let current = Settings::load(&settings).await?;
    let updated = request.apply_to(current);
    updated.save(&settings).await?;

    tracing::info!(
        target: TRACING_TARGET,
        webhook_url = %updated.webhook_url,
        has_secret_token = !updated.secret_token.is_empty(),
        enabled = updated.enabled,
        "Settings updated"
    );

    Ok((StatusCode::OK, Json(updated.into())))
}

/// Returns a [`Router`] with the settings routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/settings", get(read_settings).put(update_settings))
}
