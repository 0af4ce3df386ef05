use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Always true when the server answers.
    pub is_healthy: bool,
    /// Server version.
    pub version: String,
    /// When the report was produced.
    pub checked_at: Timestamp,
}
