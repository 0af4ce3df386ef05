//! Order event entry point.

use std::sync::Arc;

use bluelena_core::{Attribution, OrderId, Result, Settings, SettingsStore, SyncRequest};

use crate::queue::{EnqueueReceipt, SyncQueue};

/// Tracing target for order event handling.
const TRACING_TARGET: &str = "bluelena_sync::events";

/// Turns order events into queued sync requests.
///
/// Created and status-changed events are dropped while the integration is
/// disabled. A manual resync always enqueues.
#[derive(Clone)]
pub struct OrderEvents {
    settings: Arc<dyn SettingsStore>,
    queue: SyncQueue,
}

impl std::fmt::Debug for OrderEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEvents")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl OrderEvents {
    /// Creates the entry point for the given queue.
    pub fn new(settings: Arc<dyn SettingsStore>, queue: SyncQueue) -> Self {
        Self { settings, queue }
    }

    /// The queue events are sent to.
    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    /// An order was created.
    ///
    /// Returns `None` when the integration is disabled.
    pub async fn order_created(
        &self,
        order_id: OrderId,
        attribution: Attribution,
    ) -> Result<Option<EnqueueReceipt>> {
        self.on_event("order_created", order_id, attribution).await
    }

    /// The status of an order changed.
    ///
    /// Returns `None` when the integration is disabled.
    pub async fn order_status_changed(
        &self,
        order_id: OrderId,
        attribution: Attribution,
    ) -> Result<Option<EnqueueReceipt>> {
        self.on_event("order_status_changed", order_id, attribution)
            .await
    }

    /// Queues every given order again, whatever the settings say, and
    /// returns how many were queued.
    pub async fn resync<I>(&self, order_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = OrderId>,
    {
        let mut synced = 0;
        for order_id in order_ids {
            self.queue.enqueue(SyncRequest::new(order_id)).await?;
            synced += 1;
        }

        tracing::info!(
            target: TRACING_TARGET,
            synced,
            "Orders queued for resync"
        );

        Ok(synced)
    }

    async fn on_event(
        &self,
        event: &'static str,
        order_id: OrderId,
        attribution: Attribution,
    ) -> Result<Option<EnqueueReceipt>> {
        let settings = Settings::load(self.settings.as_ref()).await?;
        if !settings.enabled {
            tracing::debug!(
                target: TRACING_TARGET,
                event,
                %order_id,
                "Integration disabled, event ignored"
            );
            return Ok(None);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            event,
            %order_id,
            attributed = !attribution.is_empty(),
            "Order event received"
        );

        let request = SyncRequest::new(order_id).with_attribution(attribution);
        self.queue.enqueue(request).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use bluelena_core::types::ENABLED_KEY;
    use bluelena_core::{MemoryOrderStore, MemorySettingsStore, OrderRecord};
    use bluelena_webhook::{MockProvider, WebhookService};

    use super::*;
    use crate::{QueueConfig, TokioScheduler, WebhookDispatcher};

    async fn events(mock: &MockProvider) -> (OrderEvents, MemorySettingsStore) {
        let settings = MemorySettingsStore::new();
        Settings::new("https://hooks.example.com/orders", "s3cr3t")
            .save(&settings)
            .await
            .unwrap();

        let orders = MemoryOrderStore::new();
        orders.insert(OrderRecord::new(1001u64)).await;

        let settings_store: Arc<dyn SettingsStore> = Arc::new(settings.clone());
        let dispatcher = WebhookDispatcher::new(
            settings_store.clone(),
            Arc::new(orders),
            WebhookService::new(mock.clone()),
        );
        let queue = SyncQueue::new(
            QueueConfig::default().with_base_delay(60),
            dispatcher,
            Arc::new(TokioScheduler::new()),
        );

        (OrderEvents::new(settings_store, queue), settings)
    }

    #[tokio::test]
    async fn test_created_event_carries_attribution() {
        let mock = MockProvider::default();
        let (events, _) = events(&mock).await;

        let attribution = Attribution::from_query_string("?utm_source=newsletter&utm_term=mugs");
        let receipt = events
            .order_created(1001u64.into(), attribution.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receipt.pending, 1);

        let pending = events.queue().pending().await;
        assert_eq!(pending[0].attribution, attribution);

        events.queue().drain().await;
        let body = mock.requests().await[0].payload_json().unwrap();
        assert_eq!(body["utm"]["utm_source"], "newsletter");
        assert_eq!(body["utm"]["utm_term"], "mugs");
        assert_eq!(body["utm"]["utm_campaign"], "");
    }

    #[tokio::test]
    async fn test_disabled_integration_ignores_events() {
        let mock = MockProvider::default();
        let (events, settings) = events(&mock).await;
        settings.set(ENABLED_KEY, "0").await.unwrap();

        let created = events
            .order_created(1001u64.into(), Attribution::default())
            .await
            .unwrap();
        let changed = events
            .order_status_changed(1001u64.into(), Attribution::default())
            .await
            .unwrap();

        assert!(created.is_none());
        assert!(changed.is_none());
        assert_eq!(events.queue().status().await.pending, 0);
    }

    #[tokio::test]
    async fn test_resync_ignores_enabled_flag() {
        let mock = MockProvider::default();
        let (events, settings) = events(&mock).await;
        settings.set(ENABLED_KEY, "0").await.unwrap();

        let synced = events
            .resync([1001u64.into(), 1002u64.into(), 1001u64.into()])
            .await
            .unwrap();

        assert_eq!(synced, 3);
        let pending = events.queue().pending().await;
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|request| request.attribution.is_empty()));
    }

    #[tokio::test]
    async fn test_status_change_enqueues() {
        let mock = MockProvider::default();
        let (events, _) = events(&mock).await;

        events
            .order_status_changed(1001u64.into(), Attribution::default())
            .await
            .unwrap();
        let report = events.queue().drain().await;

        assert_eq!(report.delivered, 1);
        assert_eq!(mock.delivery_count().await, 1);
    }
}
