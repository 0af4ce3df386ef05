use bluelena_core::Settings;
use serde::{Deserialize, Serialize};

/// Settings as shown to clients; the token itself is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsView {
    /// Endpoint receiving order payloads.
    pub webhook_url: String,
    /// Whether a secret token is configured.
    pub has_secret_token: bool,
    /// Whether order events are synced.
    pub enabled: bool,
}

impl From<Settings> for SettingsView {
    fn from(settings: Settings) -> Self {
        Self {
            has_secret_token: !settings.secret_token.is_empty(),
            webhook_url: settings.webhook_url,
            enabled: settings.enabled,
        }
    }
}
