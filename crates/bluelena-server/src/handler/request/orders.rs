use bluelena_core::{Identifier, LineItem, OrderId, OrderRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request payload for creating or replacing an order.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertOrder {
    /// Identifier of the order.
    pub id: OrderId,
    /// Native order fields, forwarded untouched with the webhook payload.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Purchased line items.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl UpsertOrder {
    /// Converts the request into the stored record.
    pub fn into_record(self) -> OrderRecord {
        OrderRecord {
            id: normalize(self.id),
            fields: self.fields,
            line_items: self.line_items,
        }
    }
}

/// Request payload for changing the status of an order.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    /// New status, e.g. `processing` or `completed`.
    pub status: String,
}

/// Request payload for a bulk resync.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResyncOrders {
    /// Orders to queue again, in order.
    #[serde(default)]
    pub order_ids: Vec<OrderId>,
}

impl ResyncOrders {
    /// The requested identifiers.
    pub fn into_order_ids(self) -> impl Iterator<Item = OrderId> {
        self.order_ids.into_iter().map(normalize)
    }
}

/// `"1001"` and `1001` name the same order.
fn normalize(id: OrderId) -> OrderId {
    match id {
        Identifier::Text(text) => OrderId::from(text),
        number => number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_ids_are_normalized() {
        let request: ResyncOrders =
            serde_json::from_str(r#"{ "order_ids": [1001, "1002", "wc-7"] }"#).unwrap();

        let ids: Vec<_> = request.into_order_ids().collect();
        assert_eq!(
            ids,
            vec![
                OrderId::Number(1001),
                OrderId::Number(1002),
                OrderId::Text("wc-7".into()),
            ]
        );
    }

    #[test]
    fn upsert_defaults_to_empty_record() {
        let request: UpsertOrder = serde_json::from_str(r#"{ "id": "42" }"#).unwrap();
        let record = request.into_record();

        assert_eq!(record, OrderRecord::new(42u64));
    }
}
