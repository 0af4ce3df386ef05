//! Collaborator traits for order lookup and settings persistence.
//!
//! The sync pipeline never owns orders or settings. It talks to whatever
//! system does through these two traits:
//! - [`OrderStore`]: resolves orders and records sync annotations on them
//! - [`SettingsStore`]: key/value persistence for [`Settings`]
//!
//! In-memory implementations are provided for embedding and tests.
//!
//! [`Settings`]: crate::Settings

mod memory;

pub use memory::{MemoryOrderStore, MemorySettingsStore};

use crate::types::{OrderId, OrderRecord};
use crate::Result;

/// Lookup and annotation of orders.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Resolves an order, returning `None` when it does not exist.
    async fn get_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>>;

    /// Stores a key/value annotation on an order, replacing any previous value.
    async fn annotate(&self, order_id: &OrderId, key: &str, value: &str) -> Result<()>;

    /// Removes an annotation from an order. Missing keys are not an error.
    async fn clear_annotation(&self, order_id: &OrderId, key: &str) -> Result<()>;
}

/// Key/value persistence for integration settings.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Reads a value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
