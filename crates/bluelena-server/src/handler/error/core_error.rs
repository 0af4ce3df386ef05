//! Core error to HTTP error conversion.

use bluelena_core::ErrorKind as CoreErrorKind;

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for core error conversions.
const TRACING_TARGET: &str = "bluelena_server::handler::error";

impl From<bluelena_core::Error> for HttpError<'static> {
    fn from(error: bluelena_core::Error) -> Self {
        match error.kind {
            CoreErrorKind::NotFound => {
                tracing::debug!(target: TRACING_TARGET, error = %error, "Resource not found");
                ErrorKind::NotFound.with_message(error.message_or_kind())
            }
            CoreErrorKind::InvalidInput => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Invalid input");
                ErrorKind::BadRequest.with_message(error.message_or_kind())
            }
            CoreErrorKind::NetworkError | CoreErrorKind::Timeout | CoreErrorKind::ExternalError => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind,
                    "Collaborator unavailable"
                );
                ErrorKind::ServiceUnavailable.with_context(error.to_string())
            }
            _ => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind,
                    "Operation failed"
                );
                ErrorKind::InternalServerError.with_context(error.to_string())
            }
        }
    }
}
