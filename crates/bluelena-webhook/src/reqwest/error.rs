//! Error types for reqwest-based webhook delivery.

use thiserror::Error;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Short, log-friendly description of a transport failure.
    pub fn describe(&self) -> String {
        match self {
            Self::Reqwest(e) if e.is_timeout() => "Request timed out".to_string(),
            Self::Reqwest(e) if e.is_connect() => "Connection failed".to_string(),
            Self::Reqwest(e) if e.is_redirect() => "Too many redirects".to_string(),
            Self::Reqwest(e) => e.to_string(),
        }
    }
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        let message = err.describe();
        let Error::Reqwest(e) = err;

        let error = if e.is_timeout() {
            crate::Error::timeout()
        } else if e.is_builder() {
            crate::Error::configuration()
        } else {
            crate::Error::network_error()
        };

        error.with_message(message).with_source(e)
    }
}
