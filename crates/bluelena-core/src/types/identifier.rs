//! Opaque identifiers for orders and products.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque identifier owned by the order store.
///
/// Shops usually hand out numeric ids, but nothing in the sync pipeline
/// depends on that, so textual ids are accepted as well. Serialization is
/// untagged: `1001` and `"wc-1001"` are both valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric identifier.
    Number(u64),
    /// Textual identifier.
    Text(String),
}

/// Identifier of an order.
pub type OrderId = Identifier;

/// Identifier of a product referenced by a line item.
pub type ProductId = Identifier;

impl Identifier {
    /// Returns the numeric value, if this is a numeric identifier.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for Identifier {
    type Err = Infallible;

    /// Digits-only input parses as a number so that path segments and JSON
    /// bodies resolve to the same key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_owned()),
        })
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}
