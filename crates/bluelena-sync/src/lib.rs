#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod dispatcher;
mod events;
mod queue;

pub mod scheduler;

pub use bluelena_core::{Error, ErrorKind, Result};
pub use config::{
    DEFAULT_BASE_DELAY_SECS, DEFAULT_MAX_STAGGER_SECS, DEFAULT_STAGGER_INTERVAL_SECS, QueueConfig,
};
pub use dispatcher::{DEFAULT_DELIVERY_TIMEOUT, Dispatch, WebhookDispatcher};
pub use events::OrderEvents;
pub use queue::{DRAIN_TASK_NAME, DrainReport, EnqueueReceipt, QueueStatus, SyncQueue};
pub use scheduler::{DelayedTaskScheduler, ScheduledTask, Task, TaskId, TokioScheduler};
