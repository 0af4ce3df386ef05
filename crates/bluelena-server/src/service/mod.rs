//! Application state and dependency injection.

mod config;

use std::sync::Arc;
use std::time::Duration;

use bluelena_core::{MemoryOrderStore, MemorySettingsStore, SettingsStore};
use bluelena_sync::{OrderEvents, SyncQueue, TokioScheduler, WebhookDispatcher};
use bluelena_webhook::WebhookService;

pub use crate::service::config::{ServiceConfig, SettingsConfig};

/// Tracing target for service state initialization.
const TRACING_TARGET: &str = "bluelena_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // Embedded stores:
    pub orders: MemoryOrderStore,
    pub settings: MemorySettingsStore,

    // Sync pipeline:
    pub events: OrderEvents,
    pub queue: SyncQueue,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Seeds the settings store from `config.settings` and wires the sync
    /// queue to the given webhook transport. `delivery_timeout` bounds every
    /// webhook request.
    pub async fn from_config(
        config: &ServiceConfig,
        webhook: WebhookService,
        delivery_timeout: Duration,
    ) -> bluelena_core::Result<Self> {
        let orders = MemoryOrderStore::new();
        let settings = MemorySettingsStore::new();

        let seeded = config.settings.apply(&settings).await?;
        tracing::info!(
            target: TRACING_TARGET,
            webhook_url = %seeded.webhook_url,
            has_secret_token = !seeded.secret_token.is_empty(),
            enabled = seeded.enabled,
            "Settings initialized"
        );

        let settings_store: Arc<dyn SettingsStore> = Arc::new(settings.clone());
        let dispatcher = WebhookDispatcher::new(
            settings_store.clone(),
            Arc::new(orders.clone()),
            webhook,
        )
        .with_timeout(delivery_timeout);

        let queue = SyncQueue::new(
            config.queue.clone(),
            dispatcher,
            Arc::new(TokioScheduler::new()),
        );
        let events = OrderEvents::new(settings_store, queue.clone());

        Ok(Self {
            orders,
            settings,
            events,
            queue,
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// Embedded stores:
impl_di!(orders: MemoryOrderStore);
impl_di!(settings: MemorySettingsStore);

// Sync pipeline:
impl_di!(events: OrderEvents);
impl_di!(queue: SyncQueue);
