//! Path parameter types for HTTP handlers.

use bluelena_core::OrderId;
use serde::{Deserialize, Serialize};

/// Path parameters for order operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderPathParams {
    /// Identifier of the order, as written in the path.
    pub order_id: String,
}

impl OrderPathParams {
    /// The order identifier; digits-only segments resolve to numeric ids.
    pub fn order_id(&self) -> OrderId {
        OrderId::from(self.order_id.as_str())
    }
}
