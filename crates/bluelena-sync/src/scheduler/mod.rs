//! Delayed single-shot task scheduling.
//!
//! The queue never sleeps on its own: it asks a [`DelayedTaskScheduler`] to run
//! a drain at a point in time. [`TokioScheduler`] keeps tasks in-process; a
//! durable job queue or an external cron can implement the same trait.

mod timer;

use std::fmt;

use futures::future::BoxFuture;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use timer::TokioScheduler;

use crate::Result;

/// Tracing target for scheduler operations.
pub const TRACING_TARGET: &str = "bluelena_sync::scheduler";

/// Unit of work run by a scheduler.
pub type Task = BoxFuture<'static, ()>;

/// Identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new, time-ordered task identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A task waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Task identifier.
    pub id: TaskId,
    /// Name the task was registered under.
    pub name: String,
    /// When the task fires.
    pub run_at: Timestamp,
}

/// Schedule, cancel and inspect delayed single-shot tasks.
#[async_trait::async_trait]
pub trait DelayedTaskScheduler: Send + Sync {
    /// Registers `task` to run once at `run_at`; a past `run_at` runs it as
    /// soon as possible.
    async fn schedule_once(&self, name: &str, run_at: Timestamp, task: Task) -> Result<TaskId>;

    /// Cancels a task that has not fired yet.
    ///
    /// Returns false when the task is unknown or already running.
    async fn cancel(&self, id: TaskId) -> bool;

    /// Tasks registered under `name` that have not fired yet, earliest first.
    async fn scheduled(&self, name: &str) -> Vec<ScheduledTask>;
}
