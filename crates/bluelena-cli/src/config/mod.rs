//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig       # Host, port, shutdown
//! ├── recovery: RecoveryConfig   # Request timeout
//! ├── service: ServiceConfig     # Queue staggering, initial webhook settings
//! └── http: ReqwestConfig        # Webhook client timeout, redirects, user agent
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod server;

use std::process;

use anyhow::{Context, anyhow};
use bluelena_server::middleware::RecoveryConfig;
use bluelena_server::service::ServiceConfig;
use bluelena_webhook::reqwest::ReqwestConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "bluelena")]
#[command(about = "BlueLena Connect order sync server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Sync queue and initial webhook settings.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Webhook HTTP client.
    #[clap(flatten)]
    pub http: ReqwestConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        let request_timeout = self.recovery.request_timeout;
        if request_timeout == 0 || request_timeout > 300 {
            return Err(anyhow!(
                "Request timeout {request_timeout} seconds is invalid. Must be between 1 and 300 seconds."
            ));
        }

        if let Some(webhook_url) = self.service.settings.webhook_url.as_deref()
            && !webhook_url.is_empty()
        {
            url_is_http(webhook_url).context("invalid webhook url")?;
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            http_timeout_secs = self.http.effective_timeout().as_secs(),
            http_max_redirects = self.http.max_redirects,
            http_user_agent = %self.http.effective_user_agent(),
            "HTTP configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_delay_secs = self.service.queue.base_delay_secs,
            stagger_interval_secs = self.service.queue.stagger_interval_secs,
            max_stagger_secs = self.service.queue.max_stagger_secs,
            webhook_url = ?self.service.settings.webhook_url,
            has_secret_token = self.service.settings.secret_token.is_some(),
            enabled = ?self.service.settings.enabled,
            "Sync configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Rejects anything but an absolute http(s) URL.
fn url_is_http(webhook_url: &str) -> anyhow::Result<()> {
    let url = Url::parse(webhook_url)?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(anyhow!("unsupported scheme {scheme}, expected http or https")),
    }
}
