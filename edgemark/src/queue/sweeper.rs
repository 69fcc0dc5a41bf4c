//! Retry sweep: re-queues failed jobs with exponential spacing.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::QueueHandle;
use crate::config::RetryPolicy;
use crate::errors::StoreError;
use crate::job::{JobStatus, JobUpdate};
use crate::store::JobStore;

/// Periodic task that re-queues failed-but-retryable jobs.
///
/// Backoff is the sweep interval plus a per-job gate: a job failed `k` times
/// sits out `base * 2^k` seconds from its last update before it is honored.
/// Jobs at the retry cap never match the store query and are excluded
/// permanently.
pub struct RetrySweeper {
    store: Arc<dyn JobStore>,
    queue: QueueHandle,
    policy: RetryPolicy,
}

impl RetrySweeper {
    /// Creates a sweeper over a store and queue.
    #[must_use]
    pub fn new(store: Arc<dyn JobStore>, queue: QueueHandle, policy: RetryPolicy) -> Self {
        Self {
            store,
            queue,
            policy,
        }
    }

    /// Runs a single sweep pass and returns how many jobs were re-queued.
    pub async fn sweep_once(&self) -> Result<usize, StoreError> {
        let candidates = self.store.retryable_jobs(self.policy.max_retries).await?;
        let now = Utc::now();
        let mut requeued = 0;

        for job in candidates {
            let delay = self.policy.delay_for(job.retry_count);
            let elapsed = (now - job.updated_at).to_std().unwrap_or_default();
            if elapsed < delay {
                tracing::trace!(
                    job_id = job.id,
                    retry_count = job.retry_count,
                    "backoff window still open"
                );
                continue;
            }

            self.store
                .update(job.id, JobUpdate::status(JobStatus::Pending))
                .await?;
            if self.queue.enqueue(job.id).is_err() {
                tracing::warn!(job_id = job.id, "queue closed, stopping sweep");
                break;
            }
            requeued += 1;
            tracing::info!(
                job_id = job.id,
                retry_count = job.retry_count,
                "failed job re-queued"
            );
        }

        Ok(requeued)
    }

    /// Spawns the periodic sweep loop.
    #[must_use]
    pub fn spawn(self) -> SweeperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let interval = self.policy.sweep_interval();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so sweeps
            // start one interval in.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match self.sweep_once().await {
                            Ok(requeued) if requeued > 0 => {
                                tracing::debug!(requeued, "retry sweep finished");
                            }
                            Ok(_) => {}
                            Err(error) => tracing::error!(%error, "retry sweep failed"),
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }
            tracing::debug!("retry sweeper stopped");
        });

        SweeperHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Handle stopping a spawned sweep loop.
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the loop to stop and waits for it.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(error) = self.task.await {
            tracing::warn!(%error, "sweeper terminated abnormally");
        }
    }
}
