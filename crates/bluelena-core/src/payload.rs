//! Outbound webhook payload construction.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::types::{Attribution, OrderRecord};
use crate::Result;

/// Payload key holding the attribution object.
pub const UTM_KEY: &str = "utm";
/// Payload key holding the product summary.
pub const PRODUCTS_KEY: &str = "products";

/// The JSON object posted to the webhook for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderPayload(Map<String, Value>);

impl OrderPayload {
    /// Returns the payload as a JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Serializes the payload into its wire form.
    ///
    /// Object keys are emitted in sorted order, so equal payloads always
    /// produce identical bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }
}

/// Builds [`OrderPayload`]s from order records.
///
/// The builder is a pure function of its inputs: the order's native fields
/// are copied verbatim, then `utm` and `products` are merged in, replacing any
/// native field with the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Creates a new payload builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the payload for `order` with the given attribution.
    pub fn build(&self, order: &OrderRecord, attribution: &Attribution) -> OrderPayload {
        let mut payload = order.fields().clone();

        payload.insert(
            UTM_KEY.to_owned(),
            json!({
                "utm_campaign": attribution.utm_campaign,
                "utm_source": attribution.utm_source,
                "utm_medium": attribution.utm_medium,
                "utm_term": attribution.utm_term,
            }),
        );

        let products = order
            .line_items()
            .iter()
            .map(|item| json!({ "name": item.name, "id": item.product_id }))
            .collect();
        payload.insert(PRODUCTS_KEY.to_owned(), Value::Array(products));

        OrderPayload(payload)
    }
}
