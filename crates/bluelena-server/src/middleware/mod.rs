//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Observability: request ids, request spans, redaction of sensitive headers
//! - Recovery: request timeouts and handler panics answered with [`Error`]s
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use bluelena_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability();
//! ```
//!
//! [`Error`]: crate::handler::Error

mod observability;
mod recovery;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
