//! Work queue: single-consumer serialization of pipeline processing.
//!
//! One dedicated worker drains an unbounded FIFO, guaranteeing at most one
//! in-flight `process` call system-wide without locks around the job store.
//! Enqueueing never blocks the caller.

mod sweeper;

pub use sweeper::{RetrySweeper, SweeperHandle};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::pipeline::AnalysisPipeline;

/// Error returned when the queue worker has shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("work queue is closed")]
pub struct QueueClosed;

/// Cloneable handle used to enqueue jobs without blocking.
#[derive(Debug, Clone)]
pub struct QueueHandle {
    tx: mpsc::UnboundedSender<i64>,
}

impl QueueHandle {
    /// Appends a job id to the FIFO.
    pub fn enqueue(&self, job_id: i64) -> Result<(), QueueClosed> {
        self.tx.send(job_id).map_err(|_| QueueClosed)
    }
}

/// FIFO of job ids drained by one dedicated worker task.
pub struct WorkQueue {
    handle: QueueHandle,
    worker: JoinHandle<()>,
}

impl WorkQueue {
    /// Starts the worker task draining into the pipeline.
    ///
    /// Job failures are recorded on the job rows by the pipeline; only store
    /// faults reach the worker, and those are logged, never propagated.
    #[must_use]
    pub fn spawn(pipeline: Arc<AnalysisPipeline>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            while let Some(job_id) = rx.recv().await {
                if let Err(error) = pipeline.process(job_id).await {
                    tracing::error!(job_id, %error, "job processing hit a store failure");
                }
            }
            tracing::debug!("work queue drained and closed");
        });

        Self {
            handle: QueueHandle { tx },
            worker,
        }
    }

    /// A cloneable enqueue handle.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }

    /// Closes the queue and waits for the worker to finish the backlog.
    ///
    /// The worker stops once every outstanding [`QueueHandle`] clone has been
    /// dropped and the FIFO is empty.
    pub async fn shutdown(self) {
        drop(self.handle);
        if let Err(error) = self.worker.await {
            tracing::warn!(%error, "queue worker terminated abnormally");
        }
    }
}
