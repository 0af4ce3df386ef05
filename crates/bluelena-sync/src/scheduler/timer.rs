//! In-process scheduler backed by tokio timers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use super::{DelayedTaskScheduler, ScheduledTask, TRACING_TARGET, Task, TaskId};
use crate::Result;

#[derive(Debug)]
struct Entry {
    task: ScheduledTask,
    abort: AbortHandle,
}

/// Scheduler spawning one sleeping tokio task per schedule.
///
/// A task leaves the registry the moment it fires, before its body runs, so
/// a running task can no longer be cancelled. Pending tasks are lost when the
/// process exits.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    registry: Arc<Mutex<HashMap<TaskId, Entry>>>,
}

impl TokioScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that have not fired yet.
    pub async fn len(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Returns true when no task is waiting.
    pub async fn is_empty(&self) -> bool {
        self.registry.lock().await.is_empty()
    }
}

/// Time left until `run_at`, zero when it is in the past.
fn delay_until(run_at: Timestamp) -> Duration {
    let remaining = Timestamp::now().duration_until(run_at);
    Duration::try_from(remaining).unwrap_or_default()
}

#[async_trait::async_trait]
impl DelayedTaskScheduler for TokioScheduler {
    async fn schedule_once(&self, name: &str, run_at: Timestamp, task: Task) -> Result<TaskId> {
        let id = TaskId::new();
        let delay = delay_until(run_at);

        // Held across the spawn so the task cannot fire before it is registered.
        let mut registry = self.registry.lock().await;

        let handle = tokio::spawn({
            let registry = self.registry.clone();
            async move {
                tokio::time::sleep(delay).await;

                if registry.lock().await.remove(&id).is_none() {
                    return;
                }

                tracing::trace!(
                    target: TRACING_TARGET,
                    task_id = %id,
                    "Scheduled task fired"
                );

                task.await;
            }
        });

        registry.insert(
            id,
            Entry {
                task: ScheduledTask {
                    id,
                    name: name.to_owned(),
                    run_at,
                },
                abort: handle.abort_handle(),
            },
        );

        tracing::debug!(
            target: TRACING_TARGET,
            task_id = %id,
            name,
            %run_at,
            delay_ms = delay.as_millis(),
            "Task scheduled"
        );

        Ok(id)
    }

    async fn cancel(&self, id: TaskId) -> bool {
        let Some(entry) = self.registry.lock().await.remove(&id) else {
            return false;
        };

        entry.abort.abort();

        tracing::debug!(
            target: TRACING_TARGET,
            task_id = %id,
            name = %entry.task.name,
            "Task cancelled"
        );

        true
    }

    async fn scheduled(&self, name: &str) -> Vec<ScheduledTask> {
        let registry = self.registry.lock().await;
        let mut tasks: Vec<_> = registry
            .values()
            .filter(|entry| entry.task.name == name)
            .map(|entry| entry.task.clone())
            .collect();
        tasks.sort_by_key(|task| task.run_at);
        tasks
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jiff::SignedDuration;

    use super::*;

    fn in_secs(secs: i64) -> Timestamp {
        Timestamp::now()
            .checked_add(SignedDuration::from_secs(secs))
            .unwrap()
    }

    fn counting_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_fires_after_delay() {
        let scheduler = TokioScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule_once("drain", in_secs(10), counting_task(&counter))
            .await
            .unwrap();
        assert_eq!(scheduler.scheduled("drain").await.len(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(scheduler.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_run_at_fires_immediately() {
        let scheduler = TokioScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        scheduler
            .schedule_once("drain", in_secs(-30), counting_task(&counter))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let scheduler = TokioScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let id = scheduler
            .schedule_once("drain", in_secs(10), counting_task(&counter))
            .await
            .unwrap();

        assert!(scheduler.cancel(id).await);
        assert!(!scheduler.cancel(id).await);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_filters_by_name_and_sorts() {
        let scheduler = TokioScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let late = scheduler
            .schedule_once("drain", in_secs(60), counting_task(&counter))
            .await
            .unwrap();
        let early = scheduler
            .schedule_once("drain", in_secs(30), counting_task(&counter))
            .await
            .unwrap();
        scheduler
            .schedule_once("other", in_secs(10), counting_task(&counter))
            .await
            .unwrap();

        let ids: Vec<_> = scheduler
            .scheduled("drain")
            .await
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec![early, late]);
        assert_eq!(scheduler.len().await, 3);
    }
}
