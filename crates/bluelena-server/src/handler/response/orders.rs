use std::collections::BTreeMap;

use bluelena_core::{OrderId, OrderRecord};
use bluelena_sync::EnqueueReceipt;
use serde::{Deserialize, Serialize};

/// Answer to an order write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderQueued {
    /// The order written.
    pub order_id: OrderId,
    /// Whether a sync request was queued.
    pub queued: bool,
    /// Queue position and drain time, when queued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<EnqueueReceipt>,
}

impl OrderQueued {
    /// Builds the answer from an optional receipt.
    pub fn new(order_id: OrderId, receipt: Option<EnqueueReceipt>) -> Self {
        Self {
            order_id,
            queued: receipt.is_some(),
            receipt,
        }
    }
}

/// A stored order and its last sync annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    /// The stored order.
    pub order: OrderRecord,
    /// Annotations written by the last delivery attempt.
    pub annotations: BTreeMap<String, String>,
}

/// Answer to a bulk resync.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrdersSynced {
    /// Number of orders queued.
    pub synced: usize,
}
