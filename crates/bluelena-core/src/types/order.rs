//! Order records as handed out by the order store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{OrderId, ProductId};

/// A single purchased line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name of the purchased product.
    pub name: String,
    /// Identifier of the purchased product.
    pub product_id: ProductId,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(name: impl Into<String>, product_id: impl Into<ProductId>) -> Self {
        Self {
            name: name.into(),
            product_id: product_id.into(),
        }
    }
}

/// An order as resolved by the order store.
///
/// `fields` is the store-defined native field set and is forwarded to the
/// webhook untouched; the sync pipeline never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Identifier of the order.
    pub id: OrderId,
    /// Native order fields.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Purchased line items, in store order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl OrderRecord {
    /// Creates an order with no fields and no line items.
    pub fn new(id: impl Into<OrderId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
            line_items: Vec::new(),
        }
    }

    /// Sets a native field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Appends a line item.
    pub fn with_line_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }

    /// Returns the native field set.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the line items.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Returns the `status` field when it is a string.
    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }
}
