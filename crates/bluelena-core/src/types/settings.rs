//! Integration settings persisted in the settings store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::SettingsStore;
use crate::Result;

/// Settings key holding the webhook endpoint URL.
pub const WEBHOOK_URL_KEY: &str = "bluelena_connect_webhook_url";
/// Settings key holding the bearer credential.
pub const SECRET_TOKEN_KEY: &str = "bluelena_connect_secret_token";
/// Settings key holding the enabled flag (`"1"` or `"0"`).
pub const ENABLED_KEY: &str = "bluelena_connect_enabled";

/// Webhook delivery settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Endpoint receiving order payloads; empty disables delivery.
    #[serde(default)]
    pub webhook_url: String,
    /// Sent as `Authorization: Bearer <secret_token>`.
    #[serde(default)]
    pub secret_token: String,
    /// Master switch for the integration.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            secret_token: String::new(),
            enabled: default_enabled(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("webhook_url", &self.webhook_url)
            .field("secret_token", &"<redacted>")
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Settings {
    /// Creates enabled settings for the given endpoint and token.
    pub fn new(webhook_url: impl Into<String>, secret_token: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            secret_token: secret_token.into(),
            enabled: true,
        }
    }

    /// Sets the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns true when deliveries should actually be attempted.
    pub fn is_deliverable(&self) -> bool {
        self.enabled && !self.webhook_url.trim().is_empty()
    }

    /// Reads the settings from a key/value store, applying defaults for
    /// missing keys.
    pub async fn load(store: &dyn SettingsStore) -> Result<Self> {
        let webhook_url = store.get(WEBHOOK_URL_KEY).await?.unwrap_or_default();
        let secret_token = store.get(SECRET_TOKEN_KEY).await?.unwrap_or_default();
        let enabled = match store.get(ENABLED_KEY).await? {
            Some(value) => parse_flag(&value),
            None => default_enabled(),
        };

        Ok(Self {
            webhook_url,
            secret_token,
            enabled,
        })
    }

    /// Writes every setting to a key/value store.
    pub async fn save(&self, store: &dyn SettingsStore) -> Result<()> {
        store.set(WEBHOOK_URL_KEY, &self.webhook_url).await?;
        store.set(SECRET_TOKEN_KEY, &self.secret_token).await?;
        store
            .set(ENABLED_KEY, if self.enabled { "1" } else { "0" })
            .await
    }
}

/// `"0"`, `"false"`, `"off"`, `"no"` and the empty string are false.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySettingsStore;

    #[test]
    fn test_deliverable() {
        assert!(Settings::new("https://hooks.example.com", "t").is_deliverable());
        assert!(!Settings::new("", "t").is_deliverable());
        assert!(!Settings::new("   ", "t").is_deliverable());
        assert!(
            !Settings::new("https://hooks.example.com", "t")
                .with_enabled(false)
                .is_deliverable()
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings::new("https://hooks.example.com", "s3cr3t");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("hooks.example.com"));
    }

    #[tokio::test]
    async fn test_load_defaults_from_empty_store() {
        let store = MemorySettingsStore::new();
        let settings = Settings::load(&store).await.unwrap();

        assert_eq!(settings, Settings::default());
        assert!(settings.enabled);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemorySettingsStore::new();
        let settings = Settings::new("https://hooks.example.com/orders", "token").with_enabled(false);

        settings.save(&store).await.unwrap();
        assert_eq!(store.get(ENABLED_KEY).await.unwrap().as_deref(), Some("0"));

        let loaded = Settings::load(&store).await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("False"));
    }
}
