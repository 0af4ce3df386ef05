//! Campaign attribution captured from the triggering request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Query parameter carrying the campaign name.
pub const UTM_CAMPAIGN: &str = "utm_campaign";
/// Query parameter carrying the traffic source.
pub const UTM_SOURCE: &str = "utm_source";
/// Query parameter carrying the marketing medium.
pub const UTM_MEDIUM: &str = "utm_medium";
/// Query parameter carrying the paid search term.
pub const UTM_TERM: &str = "utm_term";

/// The `utm_*` parameters of the request that triggered a sync.
///
/// Every field defaults to the empty string, which is also what a background
/// resync without an originating request carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub utm_campaign: String,
    #[serde(default)]
    pub utm_source: String,
    #[serde(default)]
    pub utm_medium: String,
    #[serde(default)]
    pub utm_term: String,
}

impl Attribution {
    /// Picks the `utm_*` keys out of a query parameter mapping.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).cloned().unwrap_or_default();

        Self {
            utm_campaign: get(UTM_CAMPAIGN),
            utm_source: get(UTM_SOURCE),
            utm_medium: get(UTM_MEDIUM),
            utm_term: get(UTM_TERM),
        }
    }

    /// Parses a raw query string such as `utm_source=news&utm_medium=email`.
    ///
    /// A leading `?` is ignored. When a key repeats, the last value wins.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self::from_query(&params)
    }

    /// Returns true when no parameter was captured.
    pub fn is_empty(&self) -> bool {
        self.utm_campaign.is_empty()
            && self.utm_source.is_empty()
            && self.utm_medium.is_empty()
            && self.utm_term.is_empty()
    }
}
