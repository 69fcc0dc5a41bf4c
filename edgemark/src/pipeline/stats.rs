//! Per-domain job statistics for reporting surfaces.

use serde::{Deserialize, Serialize};

use super::AnalysisPipeline;
use crate::errors::StoreError;
use crate::job::JobStatus;

/// Aggregate counts over a domain's jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    /// All jobs recorded for the domain.
    pub total: usize,
    /// Jobs waiting in the queue.
    pub pending: usize,
    /// Jobs currently on the worker.
    pub processing: usize,
    /// Successfully analyzed jobs.
    pub completed: usize,
    /// Jobs whose last attempt failed.
    pub failed: usize,
    /// Mean processing time over completed jobs, zero when none completed.
    pub average_processing_time_ms: u64,
}

impl AnalysisPipeline {
    /// Summarizes the jobs recorded for a domain.
    pub async fn job_stats(&self, domain_id: i64) -> Result<JobStats, StoreError> {
        let jobs = self.store.jobs_for_domain(domain_id).await?;

        let mut stats = JobStats {
            total: jobs.len(),
            ..JobStats::default()
        };
        let mut total_time = 0u64;
        let mut timed = 0u64;

        for job in &jobs {
            match job.status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
            }
            if job.status == JobStatus::Completed {
                if let Some(ms) = job.processing_time_ms {
                    total_time += ms;
                    timed += 1;
                }
            }
        }

        if timed > 0 {
            stats.average_processing_time_ms = total_time / timed;
        }
        Ok(stats)
    }
}
