//! Pending delivery obligations.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Attribution, OrderId};

/// One pending delivery obligation held by the sync queue.
///
/// The same order may be queued several times; each request is delivered
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Order to deliver.
    pub order_id: OrderId,
    /// Attribution captured from the triggering request.
    #[serde(default)]
    pub attribution: Attribution,
    /// When the request was queued.
    pub enqueued_at: Timestamp,
}

impl SyncRequest {
    /// Creates a request without attribution.
    pub fn new(order_id: impl Into<OrderId>) -> Self {
        Self {
            order_id: order_id.into(),
            attribution: Attribution::default(),
            enqueued_at: Timestamp::now(),
        }
    }

    /// Attaches the attribution of the triggering request.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }
}
