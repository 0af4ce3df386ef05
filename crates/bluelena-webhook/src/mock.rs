//! Scripted webhook provider for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{Error, ErrorKind, Result, WebhookProvider, WebhookRequest, WebhookResponse};

/// What the mock answers to one delivery.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A completed exchange with the given status and body.
    Respond { status: u16, body: String },
    /// A transport failure with the given message.
    Fail(String),
    /// A provider error of the given kind.
    Error(ErrorKind),
}

impl MockReply {
    /// A completed exchange.
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::Respond {
            status,
            body: body.into(),
        }
    }

    /// A transport failure.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

#[derive(Debug)]
struct MockState {
    replies: VecDeque<MockReply>,
    fallback: MockReply,
    requests: Vec<WebhookRequest>,
}

/// Webhook provider answering from a script and recording every request.
///
/// Replies are consumed in order; once the script is exhausted every
/// delivery gets the fallback reply (`200 {"ok":true}` by default).
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MockReply::respond(200, r#"{"ok":true}"#))
    }
}

impl MockProvider {
    /// Creates a mock that always answers with `fallback`.
    pub fn new(fallback: MockReply) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                replies: VecDeque::new(),
                fallback,
                requests: Vec::new(),
            })),
        }
    }

    /// Queues replies consumed before the fallback.
    pub async fn script(&self, replies: impl IntoIterator<Item = MockReply>) {
        self.state.lock().await.replies.extend(replies);
    }

    /// Returns every request delivered so far.
    pub async fn requests(&self) -> Vec<WebhookRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Returns the number of deliveries so far.
    pub async fn delivery_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }
}

#[async_trait::async_trait]
impl WebhookProvider for MockProvider {
    async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(request.clone());

        let reply = match state.replies.pop_front() {
            Some(reply) => reply,
            None => state.fallback.clone(),
        };

        match reply {
            MockReply::Respond { status, body } => {
                Ok(WebhookResponse::completed(request.request_id, status, body))
            }
            MockReply::Fail(message) => Ok(WebhookResponse::failure(request.request_id, message)),
            MockReply::Error(kind) => Err(Error::new(kind).with_message("mock provider error")),
        }
    }
}
