#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod service;

pub mod request;
pub mod response;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;

pub use bluelena_core::{Error, ErrorKind, Result};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MockProvider, MockReply};
pub use request::WebhookRequest;
pub use response::WebhookResponse;
pub use service::WebhookService;

/// Tracing target for webhook operations.
pub const TRACING_TARGET: &str = "bluelena_webhook::service";

/// Core trait for webhook delivery operations.
///
/// Implement this trait to create custom webhook delivery providers.
/// Transport failures are reported as a failed [`WebhookResponse`]; an `Err`
/// means the request could not even be attempted.
#[async_trait::async_trait]
pub trait WebhookProvider: Send + Sync {
    /// Delivers a webhook payload to the specified endpoint.
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse>;
}
