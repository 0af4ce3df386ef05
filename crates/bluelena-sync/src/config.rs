//! Sync queue configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default delay before the first drain of a burst.
pub const DEFAULT_BASE_DELAY_SECS: u64 = 0;

/// Default delay added per enqueue since the last drain.
pub const DEFAULT_STAGGER_INTERVAL_SECS: u64 = 10;

/// Default upper bound on the stagger added to a single drain.
pub const DEFAULT_MAX_STAGGER_SECS: u64 = 300;

/// Staggering parameters of the sync queue.
///
/// The delay for the n-th enqueue since the last drain (zero based) is
/// `base_delay + min(n * stagger_interval, max_stagger)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct QueueConfig {
    /// Delay in seconds before the first drain of a burst
    #[cfg_attr(
        feature = "config",
        arg(long = "queue-base-delay", env = "QUEUE_BASE_DELAY", default_value = "0")
    )]
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,

    /// Seconds added per enqueue since the last drain
    #[cfg_attr(
        feature = "config",
        arg(
            long = "queue-stagger-interval",
            env = "QUEUE_STAGGER_INTERVAL",
            default_value = "10"
        )
    )]
    #[serde(default = "default_stagger_interval_secs")]
    pub stagger_interval_secs: u64,

    /// Upper bound in seconds on the stagger added to a single drain
    #[cfg_attr(
        feature = "config",
        arg(long = "queue-max-stagger", env = "QUEUE_MAX_STAGGER", default_value = "300")
    )]
    #[serde(default = "default_max_stagger_secs")]
    pub max_stagger_secs: u64,
}

fn default_base_delay_secs() -> u64 {
    DEFAULT_BASE_DELAY_SECS
}

fn default_stagger_interval_secs() -> u64 {
    DEFAULT_STAGGER_INTERVAL_SECS
}

fn default_max_stagger_secs() -> u64 {
    DEFAULT_MAX_STAGGER_SECS
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: default_base_delay_secs(),
            stagger_interval_secs: default_stagger_interval_secs(),
            max_stagger_secs: default_max_stagger_secs(),
        }
    }
}

impl QueueConfig {
    /// Set the base delay in seconds.
    #[must_use]
    pub fn with_base_delay(mut self, secs: u64) -> Self {
        self.base_delay_secs = secs;
        self
    }

    /// Set the stagger interval in seconds.
    #[must_use]
    pub fn with_stagger_interval(mut self, secs: u64) -> Self {
        self.stagger_interval_secs = secs;
        self
    }

    /// Set the stagger bound in seconds.
    #[must_use]
    pub fn with_max_stagger(mut self, secs: u64) -> Self {
        self.max_stagger_secs = secs;
        self
    }

    /// Delay for an enqueue that follows `burst` enqueues since the last drain.
    pub fn delay_for(&self, burst: u32) -> Duration {
        let stagger = u64::from(burst)
            .saturating_mul(self.stagger_interval_secs)
            .min(self.max_stagger_secs);
        Duration::from_secs(self.base_delay_secs.saturating_add(stagger))
    }
}
