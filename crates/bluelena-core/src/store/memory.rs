//! In-memory store implementations.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{OrderStore, SettingsStore};
use crate::types::{OrderId, OrderRecord};
use crate::{Error, Result, TRACING_TARGET_STORE};

/// An order together with the annotations recorded on it.
#[derive(Debug, Clone)]
struct StoredOrder {
    record: OrderRecord,
    annotations: BTreeMap<String, String>,
}

/// Order store kept in process memory.
///
/// Cloning is cheap and clones share the same orders.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, StoredOrder>>>,
}

impl MemoryOrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an order, keeping existing annotations.
    ///
    /// Returns true when the order was not known before.
    pub async fn insert(&self, record: OrderRecord) -> bool {
        let mut orders = self.orders.write().await;

        match orders.get_mut(&record.id) {
            Some(stored) => {
                stored.record = record;
                false
            }
            None => {
                tracing::debug!(
                    target: TRACING_TARGET_STORE,
                    order_id = %record.id,
                    "Order inserted"
                );
                orders.insert(
                    record.id.clone(),
                    StoredOrder {
                        record,
                        annotations: BTreeMap::new(),
                    },
                );
                true
            }
        }
    }

    /// Sets one native field of an existing order.
    pub async fn update_field(
        &self,
        order_id: &OrderId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<OrderRecord> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(order_id).ok_or_else(|| not_found(order_id))?;

        stored.record.fields.insert(key.into(), value.into());
        Ok(stored.record.clone())
    }

    /// Removes an order.
    pub async fn remove(&self, order_id: &OrderId) -> Option<OrderRecord> {
        self.orders
            .write()
            .await
            .remove(order_id)
            .map(|stored| stored.record)
    }

    /// Returns the annotations recorded on an order.
    pub async fn annotations(&self, order_id: &OrderId) -> Option<BTreeMap<String, String>> {
        self.orders
            .read()
            .await
            .get(order_id)
            .map(|stored| stored.annotations.clone())
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns true when no order is stored.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

fn not_found(order_id: &OrderId) -> Error {
    Error::not_found().with_message(format!("order {order_id} not found"))
}

#[async_trait::async_trait]
impl OrderStore for MemoryOrderStore {
    async fn get_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>> {
        Ok(self
            .orders
            .read()
            .await
            .get(order_id)
            .map(|stored| stored.record.clone()))
    }

    async fn annotate(&self, order_id: &OrderId, key: &str, value: &str) -> Result<()> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(order_id).ok_or_else(|| not_found(order_id))?;

        stored.annotations.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn clear_annotation(&self, order_id: &OrderId, key: &str) -> Result<()> {
        if let Some(stored) = self.orders.write().await.get_mut(order_id) {
            stored.annotations.remove(key);
        }
        Ok(())
    }
}

/// Settings store kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_insert_reports_new_orders() {
        let store = MemoryOrderStore::new();

        assert!(store.insert(OrderRecord::new(1u64)).await);
        assert!(!store.insert(OrderRecord::new(1u64).with_field("status", "paid")).await);
        assert_eq!(store.len().await, 1);

        let order = store.get_order(&1u64.into()).await.unwrap().unwrap();
        assert_eq!(order.status(), Some("paid"));
    }

    #[tokio::test]
    async fn test_annotations_survive_replacement() {
        let store = MemoryOrderStore::new();
        let id = OrderId::from(2u64);
        store.insert(OrderRecord::new(2u64)).await;

        store.annotate(&id, "key", "value").await.unwrap();
        store.insert(OrderRecord::new(2u64)).await;

        let annotations = store.annotations(&id).await.unwrap();
        assert_eq!(annotations.get("key").map(String::as_str), Some("value"));

        store.clear_annotation(&id, "key").await.unwrap();
        assert!(store.annotations(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_annotating_unknown_order_fails() {
        let store = MemoryOrderStore::new();
        let error = store.annotate(&3u64.into(), "k", "v").await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_field() {
        let store = MemoryOrderStore::new();
        store.insert(OrderRecord::new(4u64)).await;

        let order = store
            .update_field(&4u64.into(), "status", "completed")
            .await
            .unwrap();
        assert_eq!(order.status(), Some("completed"));

        assert!(store.update_field(&5u64.into(), "status", "x").await.is_err());
    }

    #[tokio::test]
    async fn test_settings_store_roundtrip() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("key", "value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("value"));
    }
}
