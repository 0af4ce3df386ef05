//! Webhook delivery request type.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

/// A webhook delivery request.
#[derive(Clone)]
pub struct WebhookRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// The webhook endpoint URL.
    pub url: Url,
    /// Serialized JSON body.
    pub payload: Vec<u8>,
    /// Credential sent as `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
    /// Custom headers to include in the request.
    pub headers: HashMap<String, String>,
    /// Optional request timeout (uses client default if not set).
    pub timeout: Option<Duration>,
}

impl WebhookRequest {
    /// Creates a new webhook request with an already serialized JSON body.
    pub fn new(url: Url, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            url,
            payload,
            bearer_token: None,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Sets the bearer credential.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a custom header to the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the body as a JSON value, if it parses.
    pub fn payload_json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.payload).ok()
    }
}

impl fmt::Debug for WebhookRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookRequest")
            .field("request_id", &self.request_id)
            .field("url", &self.url.as_str())
            .field("payload_len", &self.payload.len())
            .field("has_bearer_token", &self.bearer_token.is_some())
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}
