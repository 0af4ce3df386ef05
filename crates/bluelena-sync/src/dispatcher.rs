//! Single-order webhook delivery.

use std::sync::Arc;
use std::time::Duration;

use bluelena_core::{
    DeliveryOutcome, OrderStore, PayloadBuilder, Result, Settings, SettingsStore, SyncRequest,
};
use bluelena_webhook::{WebhookRequest, WebhookResponse, WebhookService};
use url::Url;

/// Tracing target for dispatcher operations.
const TRACING_TARGET: &str = "bluelena_sync::dispatcher";

/// Request timeout applied to every delivery.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(40);

/// What a delivery attempt amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Delivery is disabled or no endpoint is configured; nothing was sent
    /// and nothing was recorded.
    Skipped,
    /// An attempt was made and its outcome recorded on the order.
    Recorded(DeliveryOutcome),
}

impl Dispatch {
    /// The recorded outcome, if any.
    pub fn outcome(&self) -> Option<&DeliveryOutcome> {
        match self {
            Self::Skipped => None,
            Self::Recorded(outcome) => Some(outcome),
        }
    }
}

/// Performs one delivery attempt for one order and records its outcome.
#[derive(Clone)]
pub struct WebhookDispatcher {
    settings: Arc<dyn SettingsStore>,
    orders: Arc<dyn OrderStore>,
    webhook: WebhookService,
    builder: PayloadBuilder,
    timeout: Duration,
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookDispatcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WebhookDispatcher {
    /// Creates a dispatcher over the given collaborators.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        orders: Arc<dyn OrderStore>,
        webhook: WebhookService,
    ) -> Self {
        Self {
            settings,
            orders,
            webhook,
            builder: PayloadBuilder::new(),
            timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delivers one order.
    ///
    /// Lookup and transport failures are recorded outcomes, not errors. An
    /// `Err` means a collaborator (settings or order store) failed.
    pub async fn deliver(&self, request: &SyncRequest) -> Result<Dispatch> {
        let order_id = &request.order_id;
        let settings = Settings::load(self.settings.as_ref()).await?;

        if !settings.is_deliverable() {
            tracing::debug!(
                target: TRACING_TARGET,
                %order_id,
                enabled = settings.enabled,
                "Delivery disabled, skipping order"
            );
            return Ok(Dispatch::Skipped);
        }

        let Some(order) = self.orders.get_order(order_id).await? else {
            tracing::warn!(
                target: TRACING_TARGET,
                %order_id,
                "Order not found, nothing delivered"
            );
            return Ok(Dispatch::Recorded(DeliveryOutcome::not_found(
                order_id.clone(),
            )));
        };

        let outcome = match Url::parse(settings.webhook_url.trim()) {
            Ok(url) => {
                let payload = self.builder.build(&order, &request.attribution).to_vec()?;
                let mut webhook_request = WebhookRequest::new(url, payload).with_timeout(self.timeout);
                if !settings.secret_token.is_empty() {
                    webhook_request = webhook_request.with_bearer_token(&settings.secret_token);
                }

                match self.webhook.deliver(&webhook_request).await {
                    Ok(response) => outcome_from(order_id, response),
                    Err(err) => DeliveryOutcome::transport_failure(
                        order_id.clone(),
                        err.message_or_kind(),
                    ),
                }
            }
            Err(err) => DeliveryOutcome::transport_failure(
                order_id.clone(),
                format!("invalid webhook url: {err}"),
            ),
        };

        self.record(&outcome).await?;

        if outcome.success {
            tracing::info!(
                target: TRACING_TARGET,
                %order_id,
                status_code = ?outcome.status_code,
                accepted = outcome.is_accepted(),
                "Order delivered"
            );
        } else {
            tracing::warn!(
                target: TRACING_TARGET,
                %order_id,
                error = ?outcome.error_message,
                "Order delivery failed"
            );
        }

        Ok(Dispatch::Recorded(outcome))
    }

    /// Persists the outcome as the order's last-sync annotations.
    async fn record(&self, outcome: &DeliveryOutcome) -> Result<()> {
        for key in outcome.stale_annotations() {
            self.orders.clear_annotation(&outcome.order_id, key).await?;
        }

        for (key, value) in outcome.annotations() {
            self.orders.annotate(&outcome.order_id, key, &value).await?;
        }

        Ok(())
    }
}

fn outcome_from(order_id: &bluelena_core::OrderId, response: WebhookResponse) -> DeliveryOutcome {
    match response.status_code {
        Some(status_code) => DeliveryOutcome::completed(
            order_id.clone(),
            status_code,
            response.body.unwrap_or_default(),
        ),
        None => DeliveryOutcome::transport_failure(
            order_id.clone(),
            response
                .error
                .unwrap_or_else(|| "request failed".to_owned()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::Router;
    use axum::routing::post;
    use bluelena_core::types::{
        ANNOTATION_ERROR, ANNOTATION_RESPONSE_BODY, ANNOTATION_RESPONSE_CODE,
    };
    use bluelena_core::{
        ErrorKind, LineItem, MemoryOrderStore, MemorySettingsStore, OrderRecord,
    };
    use bluelena_webhook::reqwest::ReqwestClient;
    use bluelena_webhook::{MockProvider, MockReply};
    use tokio::net::TcpListener;

    use super::*;

    struct Fixture {
        settings: MemorySettingsStore,
        orders: MemoryOrderStore,
        mock: MockProvider,
        dispatcher: WebhookDispatcher,
    }

    async fn fixture(settings: Settings) -> Fixture {
        let settings_store = MemorySettingsStore::new();
        settings.save(&settings_store).await.unwrap();

        let orders = MemoryOrderStore::new();
        orders
            .insert(
                OrderRecord::new(1001u64)
                    .with_field("status", "processing")
                    .with_line_item(LineItem::new("Mug", 7u64)),
            )
            .await;

        let mock = MockProvider::default();
        let dispatcher = WebhookDispatcher::new(
            Arc::new(settings_store.clone()),
            Arc::new(orders.clone()),
            WebhookService::new(mock.clone()),
        );

        Fixture {
            settings: settings_store,
            orders,
            mock,
            dispatcher,
        }
    }

    fn enabled() -> Settings {
        Settings::new("https://hooks.example.com/orders", "s3cr3t")
    }

    #[tokio::test]
    async fn test_completed_exchange_is_recorded() {
        let fx = fixture(enabled()).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let outcome = dispatch.outcome().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.status_code, Some(200));

        let annotations = fx.orders.annotations(&1001u64.into()).await.unwrap();
        assert_eq!(annotations[ANNOTATION_RESPONSE_CODE], "200");
        assert_eq!(annotations[ANNOTATION_RESPONSE_BODY], r#"{"ok":true}"#);
        assert!(!annotations.contains_key(ANNOTATION_ERROR));
    }

    #[tokio::test]
    async fn test_request_carries_payload_token_and_timeout() {
        let fx = fixture(enabled()).await;

        fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let requests = fx.mock.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url.as_str(), "https://hooks.example.com/orders");
        assert_eq!(request.bearer_token.as_deref(), Some("s3cr3t"));
        assert_eq!(request.timeout, Some(DEFAULT_DELIVERY_TIMEOUT));

        let body = request.payload_json().unwrap();
        assert_eq!(body["status"], "processing");
        assert_eq!(body["products"][0]["name"], "Mug");
        assert_eq!(body["utm"]["utm_source"], "");
    }

    #[tokio::test]
    async fn test_empty_token_sends_no_credential() {
        let fx = fixture(Settings::new("https://hooks.example.com", "")).await;

        fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        assert!(fx.mock.requests().await[0].bearer_token.is_none());
    }

    #[tokio::test]
    async fn test_disabled_settings_skip_without_side_effects() {
        let fx = fixture(enabled().with_enabled(false)).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        assert_eq!(dispatch, Dispatch::Skipped);
        assert_eq!(fx.mock.delivery_count().await, 0);
        assert!(fx.orders.annotations(&1001u64.into()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_url_skips() {
        let fx = fixture(Settings::new("", "s3cr3t")).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        assert_eq!(dispatch, Dispatch::Skipped);
        assert_eq!(fx.mock.delivery_count().await, 0);
    }

    #[tokio::test]
    async fn test_settings_are_read_per_delivery() {
        let fx = fixture(enabled()).await;
        enabled()
            .with_enabled(false)
            .save(&fx.settings)
            .await
            .unwrap();

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();
        assert_eq!(dispatch, Dispatch::Skipped);
    }

    #[tokio::test]
    async fn test_unknown_order_is_a_failure_outcome() {
        let fx = fixture(enabled()).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(404u64)).await.unwrap();

        let outcome = dispatch.outcome().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("order 404 not found"));
        assert_eq!(fx.mock.delivery_count().await, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_replaces_response_annotations() {
        let fx = fixture(enabled()).await;
        fx.mock
            .script([
                MockReply::respond(201, "created"),
                MockReply::fail("Connection failed"),
            ])
            .await;

        fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();
        fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let annotations = fx.orders.annotations(&1001u64.into()).await.unwrap();
        assert_eq!(annotations[ANNOTATION_ERROR], "Connection failed");
        assert!(!annotations.contains_key(ANNOTATION_RESPONSE_CODE));
        assert!(!annotations.contains_key(ANNOTATION_RESPONSE_BODY));
    }

    #[tokio::test]
    async fn test_rejection_is_recorded_as_success() {
        let fx = fixture(enabled()).await;
        fx.mock.script([MockReply::respond(500, "boom")]).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let outcome = dispatch.outcome().unwrap();
        assert!(outcome.success);
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.response_body.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_provider_error_is_a_failure_outcome() {
        let fx = fixture(enabled()).await;
        fx.mock.script([MockReply::Error(ErrorKind::Configuration)]).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let outcome = dispatch.outcome().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("mock provider error"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_failure_outcome() {
        let fx = fixture(Settings::new("not a url", "s3cr3t")).await;

        let dispatch = fx.dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let outcome = dispatch.outcome().unwrap();
        assert!(!outcome.success);
        assert!(outcome.error_message.as_deref().unwrap().starts_with("invalid webhook url"));
        assert_eq!(fx.mock.delivery_count().await, 0);
    }

    async fn spawn_endpoint() -> SocketAddr {
        let router = Router::new()
            .route("/ok", post(|| async { r#"{"ok":true}"# }))
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    r#"{"ok":true}"#
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    async fn http_dispatcher(url: String, orders: &MemoryOrderStore) -> WebhookDispatcher {
        let settings = MemorySettingsStore::new();
        Settings::new(url, "s3cr3t").save(&settings).await.unwrap();

        let client = ReqwestClient::with_defaults().unwrap();
        WebhookDispatcher::new(
            Arc::new(settings),
            Arc::new(orders.clone()),
            client.into_service(),
        )
        .with_timeout(Duration::from_millis(250))
    }

    #[tokio::test]
    async fn test_http_delivery_annotates_response() {
        let addr = spawn_endpoint().await;
        let orders = MemoryOrderStore::new();
        orders.insert(OrderRecord::new(1001u64)).await;
        let dispatcher = http_dispatcher(format!("http://{addr}/ok"), &orders).await;

        dispatcher.deliver(&SyncRequest::new(1001u64)).await.unwrap();

        let annotations = orders.annotations(&1001u64.into()).await.unwrap();
        assert_eq!(annotations[ANNOTATION_RESPONSE_CODE], "200");
        assert_eq!(annotations[ANNOTATION_RESPONSE_BODY], r#"{"ok":true}"#);
        assert!(!annotations.contains_key(ANNOTATION_ERROR));
    }

    #[tokio::test]
    async fn test_http_timeout_annotates_error() {
        let addr = spawn_endpoint().await;
        let orders = MemoryOrderStore::new();
        orders.insert(OrderRecord::new(1002u64)).await;
        let dispatcher = http_dispatcher(format!("http://{addr}/slow"), &orders).await;

        dispatcher.deliver(&SyncRequest::new(1002u64)).await.unwrap();

        let annotations = orders.annotations(&1002u64.into()).await.unwrap();
        assert_eq!(annotations[ANNOTATION_ERROR], "Request timed out");
        assert!(!annotations.contains_key(ANNOTATION_RESPONSE_CODE));
    }
}
