//! Webhook client implementation using reqwest.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, redirect};

use super::TRACING_TARGET;
use super::config::ReqwestConfig;
use super::error::{Error, Result};
use crate::{WebhookProvider, WebhookRequest, WebhookResponse, WebhookService};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

impl std::fmt::Debug for ReqwestClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Reqwest-based webhook client.
///
/// Posts the serialized order payload as `application/json`, attaching the
/// bearer credential when one is configured. Redirects are followed up to the
/// configured limit and the response body is captured verbatim.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            timeout_secs = config.http_timeout,
            max_redirects = config.max_redirects,
            "Creating reqwest webhook client"
        );

        let http = Client::builder()
            .timeout(config.effective_timeout())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.effective_user_agent())
            .build()?;

        let inner = ReqwestClientInner { http, config };

        tracing::info!(
            target: TRACING_TARGET,
            "Reqwest webhook client created"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a new client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ReqwestConfig::default())
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`WebhookService`] for use with dependency injection.
    pub fn into_service(self) -> WebhookService {
        WebhookService::new(self)
    }
}

#[async_trait::async_trait]
impl WebhookProvider for ReqwestClient {
    async fn deliver(&self, request: &WebhookRequest) -> crate::Result<WebhookResponse> {
        let started_at = Instant::now();
        let timeout = request
            .timeout
            .unwrap_or_else(|| self.inner.config.effective_timeout());

        let mut http_request = self
            .inner
            .http
            .post(request.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout);

        if let Some(token) = &request.bearer_token {
            http_request = http_request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        let result = http_request.body(request.payload.clone()).send().await;

        let outcome = match result {
            Ok(http_response) => {
                let status_code = http_response.status().as_u16();
                http_response
                    .text()
                    .await
                    .map(|body| (status_code, body))
                    .map_err(Error::from)
            }
            Err(err) => Err(Error::from(err)),
        };
        let elapsed = started_at.elapsed();

        match outcome {
            Ok((status_code, body)) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    status_code,
                    body_bytes = body.len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Webhook exchange completed"
                );

                Ok(WebhookResponse::completed(request.request_id, status_code, body)
                    .with_duration(elapsed))
            }
            Err(err) => {
                let error_message = err.describe();

                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error_message,
                    elapsed_ms = elapsed.as_millis(),
                    "Webhook transport failed"
                );

                Ok(WebhookResponse::failure(request.request_id, error_message)
                    .with_duration(elapsed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::Router;
    use axum::http::HeaderMap;
    use axum::response::Redirect;
    use axum::routing::post;
    use tokio::net::TcpListener;
    use url::Url;

    use super::*;

    async fn spawn_endpoint() -> SocketAddr {
        let router = Router::new()
            .route("/ok", post(|| async { r#"{"ok":true}"# }))
            .route(
                "/echo-auth",
                post(|headers: HeaderMap| async move {
                    headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_string()
                }),
            )
            .route("/echo-body", post(|body: String| async move { body }))
            .route(
                "/rejected",
                post(|| async { (axum::http::StatusCode::UNPROCESSABLE_ENTITY, "bad order") }),
            )
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route("/moved", post(|| async { Redirect::temporary("/ok") }))
            .route("/loop", post(|| async { Redirect::temporary("/loop") }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn request_to(addr: SocketAddr, path: &str) -> WebhookRequest {
        let url = Url::parse(&format!("http://{addr}{path}")).unwrap();
        WebhookRequest::new(url, br#"{"id":1001}"#.to_vec())
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestClient::with_defaults();
        assert!(client.is_ok());
        assert_eq!(client.unwrap().config().http_timeout, 40);
    }

    #[tokio::test]
    async fn test_delivers_and_captures_body() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let response = client.deliver(&request_to(addr, "/ok")).await.unwrap();

        assert_eq!(response.status_code, Some(200));
        assert_eq!(response.body.as_deref(), Some(r#"{"ok":true}"#));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_sends_payload_verbatim() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let response = client.deliver(&request_to(addr, "/echo-body")).await.unwrap();

        assert_eq!(response.body.as_deref(), Some(r#"{"id":1001}"#));
    }

    #[tokio::test]
    async fn test_bearer_token_header() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let request = request_to(addr, "/echo-auth").with_bearer_token("s3cr3t");
        let response = client.deliver(&request).await.unwrap();
        assert_eq!(response.body.as_deref(), Some("Bearer s3cr3t"));

        let request = request_to(addr, "/echo-auth");
        let response = client.deliver(&request).await.unwrap();
        assert_eq!(response.body.as_deref(), Some("none"));
    }

    #[tokio::test]
    async fn test_rejection_is_a_completed_exchange() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let response = client.deliver(&request_to(addr, "/rejected")).await.unwrap();

        assert!(response.is_completed());
        assert!(!response.is_success());
        assert_eq!(response.status_code, Some(422));
        assert_eq!(response.body.as_deref(), Some("bad order"));
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let request = request_to(addr, "/slow").with_timeout(Duration::from_millis(200));
        let response = client.deliver(&request).await.unwrap();

        assert!(!response.is_completed());
        assert_eq!(response.error.as_deref(), Some("Request timed out"));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReqwestClient::with_defaults().unwrap();
        let response = client.deliver(&request_to(addr, "/ok")).await.unwrap();

        assert!(!response.is_completed());
        assert_eq!(response.error.as_deref(), Some("Connection failed"));
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let response = client.deliver(&request_to(addr, "/moved")).await.unwrap();

        assert_eq!(response.status_code, Some(200));
        assert_eq!(response.body.as_deref(), Some(r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn test_redirect_limit() {
        let addr = spawn_endpoint().await;
        let client = ReqwestClient::with_defaults().unwrap();

        let response = client.deliver(&request_to(addr, "/loop")).await.unwrap();

        assert!(!response.is_completed());
        assert_eq!(response.error.as_deref(), Some("Too many redirects"));
    }
}
