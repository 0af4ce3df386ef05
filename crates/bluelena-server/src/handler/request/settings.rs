use bluelena_core::Settings;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::handler::{ErrorKind, Result};

/// Request payload for replacing the webhook settings.
#[must_use]
#[derive(Clone, Serialize, Deserialize)]
pub struct UpdateSettings {
    /// Endpoint receiving order payloads; empty disables delivery.
    #[serde(default)]
    pub webhook_url: String,
    /// New bearer credential; omitted keeps the current one, empty clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<String>,
    /// Master switch for the integration.
    pub enabled: bool,
}

impl std::fmt::Debug for UpdateSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateSettings")
            .field("webhook_url", &self.webhook_url)
            .field("secret_token", &self.secret_token.as_ref().map(|_| "<redacted>"))
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl UpdateSettings {
    /// Rejects a non-empty URL that is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let webhook_url = self.webhook_url.trim();
        if webhook_url.is_empty() {
            return Ok(());
        }

        let url = Url::parse(webhook_url).map_err(|err| {
            ErrorKind::BadRequest
                .with_message("webhook_url is not a valid URL")
                .with_context(err.to_string())
                .with_resource("settings")
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ErrorKind::BadRequest
                .with_message("webhook_url must use http or https")
                .with_context(format!("unsupported scheme: {scheme}"))
                .with_resource("settings")),
        }
    }

    /// Applies the request on top of the current settings.
    pub fn apply_to(self, current: Settings) -> Settings {
        Settings {
            webhook_url: self.webhook_url.trim().to_owned(),
            secret_token: self.secret_token.unwrap_or(current.secret_token),
            enabled: self.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(webhook_url: &str) -> UpdateSettings {
        UpdateSettings {
            webhook_url: webhook_url.into(),
            secret_token: None,
            enabled: true,
        }
    }

    #[test]
    fn accepts_empty_and_http_urls() {
        assert!(request("").validate().is_ok());
        assert!(request("http://localhost:8080/hook").validate().is_ok());
        assert!(request("https://hooks.example.com/orders").validate().is_ok());
    }

    #[test]
    fn rejects_other_urls() {
        let error = request("not a url").validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let error = request("ftp://files.example.com").validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn omitted_token_keeps_current() {
        let current = Settings::new("https://old.example.com", "s3cr3t");

        let kept = request(" https://new.example.com ").apply_to(current.clone());
        assert_eq!(kept.webhook_url, "https://new.example.com");
        assert_eq!(kept.secret_token, "s3cr3t");

        let cleared = UpdateSettings {
            secret_token: Some(String::new()),
            ..request("")
        }
        .apply_to(current);
        assert!(cleared.secret_token.is_empty());
    }
}
