//! Staggered order-sync queue.

use std::sync::Arc;

use bluelena_core::{Error, Result, SyncRequest};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::QueueConfig;
use crate::dispatcher::{Dispatch, WebhookDispatcher};
use crate::scheduler::{DelayedTaskScheduler, Task, TaskId};

/// Tracing target for queue operations.
const TRACING_TARGET: &str = "bluelena_sync::queue";

/// Name under which drains are registered with the scheduler.
pub const DRAIN_TASK_NAME: &str = "bluelena_process_sync_queue";

/// Returned by [`SyncQueue::enqueue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueReceipt {
    /// Requests waiting for the next drain, this one included.
    pub pending: usize,
    /// Time left until the next drain.
    pub delay: SignedDuration,
    /// When the next drain fires.
    pub run_at: Timestamp,
}

/// Returned by [`SyncQueue::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Requests taken from the queue.
    pub attempted: usize,
    /// Requests that reached the endpoint.
    pub delivered: usize,
    /// Requests whose delivery failed or could not be recorded.
    pub failed: usize,
    /// Requests skipped because delivery was disabled.
    pub skipped: usize,
}

/// Snapshot of the queue state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Requests waiting for the next drain.
    pub pending: usize,
    /// When the next drain fires, if one is scheduled.
    pub next_drain_at: Option<Timestamp>,
    /// Enqueues since the last drain.
    pub burst: u32,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledDrain {
    id: TaskId,
    run_at: Timestamp,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Vec<SyncRequest>,
    burst: u32,
    next_drain: Option<ScheduledDrain>,
}

struct SyncQueueInner {
    config: QueueConfig,
    dispatcher: WebhookDispatcher,
    scheduler: Arc<dyn DelayedTaskScheduler>,
    state: Mutex<QueueState>,
    // Serialises drains so two batches never interleave.
    dispatch: Mutex<()>,
}

/// Buffers order-sync requests and drains them through a
/// [`WebhookDispatcher`] on a staggered schedule.
///
/// At most one drain is scheduled at a time. Every enqueue since the last
/// drain pushes it back by the stagger interval, bounded by
/// [`QueueConfig::max_stagger_secs`]. Requests are never deduplicated and
/// never retried.
#[derive(Clone)]
pub struct SyncQueue {
    inner: Arc<SyncQueueInner>,
}

impl std::fmt::Debug for SyncQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncQueue")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl SyncQueue {
    /// Creates an empty queue.
    pub fn new(
        config: QueueConfig,
        dispatcher: WebhookDispatcher,
        scheduler: Arc<dyn DelayedTaskScheduler>,
    ) -> Self {
        let inner = SyncQueueInner {
            config,
            dispatcher,
            scheduler,
            state: Mutex::new(QueueState::default()),
            dispatch: Mutex::new(()),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Appends a request and makes sure a drain is scheduled for it.
    ///
    /// The request stays queued even when scheduling fails; it then goes out
    /// with the next drain.
    pub async fn enqueue(&self, request: SyncRequest) -> Result<EnqueueReceipt> {
        let order_id = request.order_id.clone();
        let mut state = self.inner.state.lock().await;

        state.pending.push(request);
        let delay = self.inner.config.delay_for(state.burst);
        state.burst = state.burst.saturating_add(1);

        let delay = SignedDuration::try_from(delay).map_err(|err| {
            Error::configuration()
                .with_message("queue delay out of range")
                .with_source(err)
        })?;
        let now = Timestamp::now();
        let run_at = now.checked_add(delay).map_err(|err| {
            Error::configuration()
                .with_message("queue delay out of range")
                .with_source(err)
        })?;

        let current = state.next_drain;
        let drain = match current {
            Some(existing) if existing.run_at >= run_at => existing,
            _ => {
                // The replacement is scheduled before the old drain is
                // cancelled, so pending requests always have a drain.
                let id = self
                    .inner
                    .scheduler
                    .schedule_once(DRAIN_TASK_NAME, run_at, self.drain_task())
                    .await?;
                let drain = ScheduledDrain { id, run_at };

                if let Some(existing) = state.next_drain.replace(drain) {
                    self.inner.scheduler.cancel(existing.id).await;
                }
                drain
            }
        };

        tracing::debug!(
            target: TRACING_TARGET,
            %order_id,
            pending = state.pending.len(),
            burst = state.burst,
            run_at = %drain.run_at,
            "Order queued for sync"
        );

        Ok(EnqueueReceipt {
            pending: state.pending.len(),
            delay: now.duration_until(drain.run_at),
            run_at: drain.run_at,
        })
    }

    /// Takes every pending request and delivers them in enqueue order.
    ///
    /// Requests enqueued while the batch is being delivered wait for the next
    /// drain. A failed delivery is counted and logged, and the batch
    /// continues.
    ///
    /// The batch runs on its own task: dropping the returned future does not
    /// stop the delivery of requests already taken from the queue.
    pub async fn drain(&self) -> DrainReport {
        let queue = self.clone();
        let handle = tokio::spawn(async move { queue.drain_batch().await });

        match handle.await {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Sync queue drain task failed"
                );
                DrainReport::default()
            }
        }
    }

    async fn drain_batch(&self) -> DrainReport {
        let _dispatch = self.inner.dispatch.lock().await;

        let batch = {
            let mut state = self.inner.state.lock().await;
            if state.pending.is_empty() {
                return DrainReport::default();
            }

            state.burst = 0;
            if let Some(drain) = state.next_drain.take() {
                self.inner.scheduler.cancel(drain.id).await;
            }
            std::mem::take(&mut state.pending)
        };

        tracing::info!(
            target: TRACING_TARGET,
            batch_size = batch.len(),
            "Draining sync queue"
        );

        let mut report = DrainReport {
            attempted: batch.len(),
            ..DrainReport::default()
        };

        for request in &batch {
            match self.inner.dispatcher.deliver(request).await {
                Ok(Dispatch::Skipped) => report.skipped += 1,
                Ok(Dispatch::Recorded(outcome)) if outcome.success => report.delivered += 1,
                Ok(Dispatch::Recorded(_)) => report.failed += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::error!(
                        target: TRACING_TARGET,
                        order_id = %request.order_id,
                        error = %err,
                        "Order delivery aborted"
                    );
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            skipped = report.skipped,
            "Sync queue drained"
        );

        report
    }

    /// Returns a snapshot of the queue state.
    pub async fn status(&self) -> QueueStatus {
        let state = self.inner.state.lock().await;
        QueueStatus {
            pending: state.pending.len(),
            next_drain_at: state.next_drain.map(|drain| drain.run_at),
            burst: state.burst,
        }
    }

    /// Requests waiting for the next drain, in enqueue order.
    pub async fn pending(&self) -> Vec<SyncRequest> {
        self.inner.state.lock().await.pending.clone()
    }

    fn drain_task(&self) -> Task {
        let queue = self.clone();
        Box::pin(async move {
            queue.drain().await;
        })
    }
}
