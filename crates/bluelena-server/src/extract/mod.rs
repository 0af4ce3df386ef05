//! Request extractors that reject with the API error format.
//!
//! - [`Json`] - JSON bodies; malformed input answers `400 bad_request`
//! - [`Path`] - path parameters; undecodable parameters answer `400 bad_request`
//!
//! Both are drop-in replacements for their `axum` counterparts.

mod json;
mod path;

pub use self::json::Json;
pub use self::path::Path;

/// Keeps rejection details short enough for a log line.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}
