//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use bluelena_server::handler::routes;
//! use bluelena_server::service::{ServiceConfig, ServiceState};
//! use bluelena_webhook::reqwest::{ReqwestClient, ReqwestConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let webhook = ReqwestClient::new(ReqwestConfig::default())?.into_service();
//! let state = ServiceState::from_config(
//!     &ServiceConfig::default(),
//!     webhook,
//!     Duration::from_secs(40),
//! )
//! .await?;
//!
//! let app: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod orders;
mod queue;
mod request;
mod response;
mod settings;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(orders::routes())
        .merge(settings::routes())
        .merge(queue::routes())
        .merge(monitors::routes())
        .fallback(handler)
}
