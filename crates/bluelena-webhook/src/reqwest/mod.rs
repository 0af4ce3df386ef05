//! Reqwest-based HTTP client for webhook delivery.
//!
//! This module provides a reqwest-based implementation of the [`WebhookProvider`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use bluelena_webhook::reqwest::{ReqwestClient, ReqwestConfig};
//! use bluelena_webhook::WebhookService;
//!
//! // Create a client with default configuration
//! let client = ReqwestClient::new(ReqwestConfig::default())?;
//!
//! // Convert to a service for dependency injection
//! let service: WebhookService = client.into_service();
//! ```
//!
//! [`WebhookProvider`]: crate::WebhookProvider

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "bluelena_webhook::reqwest";
