//! Webhook delivery response types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response from a webhook delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// HTTP status code, absent when no response was received.
    pub status_code: Option<u16>,
    /// Response body from the webhook endpoint.
    pub body: Option<String>,
    /// Error message if the request could not be completed.
    pub error: Option<String>,
    /// Response time in milliseconds.
    pub response_time_ms: Option<u64>,
}

impl WebhookResponse {
    /// Creates a response for a completed HTTP exchange.
    pub fn completed(request_id: Uuid, status_code: u16, body: impl Into<String>) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            status_code: Some(status_code),
            body: Some(body.into()),
            error: None,
            response_time_ms: None,
        }
    }

    /// Creates a response for a request that could not be completed.
    pub fn failure(request_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            status_code: None,
            body: None,
            error: Some(error.into()),
            response_time_ms: None,
        }
    }

    /// Sets the response time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.response_time_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Returns whether a response was received.
    pub fn is_completed(&self) -> bool {
        self.status_code.is_some()
    }

    /// Returns whether the endpoint answered with a 2xx status code.
    pub fn is_success(&self) -> bool {
        self.status_code.is_some_and(|code| (200..300).contains(&code))
    }
}
