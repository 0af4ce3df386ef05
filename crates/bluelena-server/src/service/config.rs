//! Service configuration.

use bluelena_core::{Result, Settings, SettingsStore};
use bluelena_sync::QueueConfig;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Staggering of the sync queue.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[serde(default)]
    pub queue: QueueConfig,

    /// Initial webhook settings.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Webhook settings applied to the settings store at startup.
///
/// Unset values keep whatever the store already holds, or its defaults.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SettingsConfig {
    /// Endpoint receiving order payloads
    #[cfg_attr(feature = "config", arg(long = "webhook-url", env = "WEBHOOK_URL"))]
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Bearer credential sent with every delivery
    #[cfg_attr(
        feature = "config",
        arg(long = "secret-token", env = "SECRET_TOKEN", hide_env_values = true)
    )]
    #[serde(default)]
    pub secret_token: Option<String>,

    /// Whether order events are synced
    #[cfg_attr(
        feature = "config",
        arg(
            long = "sync-enabled",
            env = "SYNC_ENABLED",
            value_parser = clap::builder::BoolishValueParser::new()
        )
    )]
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl std::fmt::Debug for SettingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsConfig")
            .field("webhook_url", &self.webhook_url)
            .field("secret_token", &self.secret_token.as_ref().map(|_| "<redacted>"))
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl SettingsConfig {
    /// Writes the configured values over the stored settings and returns the
    /// result.
    pub async fn apply(&self, store: &dyn SettingsStore) -> Result<Settings> {
        let mut settings = Settings::load(store).await?;

        if let Some(webhook_url) = &self.webhook_url {
            settings.webhook_url = webhook_url.clone();
        }
        if let Some(secret_token) = &self.secret_token {
            settings.secret_token = secret_token.clone();
        }
        if let Some(enabled) = self.enabled {
            settings.enabled = enabled;
        }

        settings.save(store).await?;
        Ok(settings)
    }
}
