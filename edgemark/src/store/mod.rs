//! Persistence seams for jobs and domain aggregates.
//!
//! The pipeline treats both stores as remote collaborators: every call is
//! async and fallible. The in-memory implementations back tests and
//! single-node deployments.

mod memory;

pub use memory::{InMemoryDomainStore, InMemoryJobStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::job::{AnalysisJob, JobUpdate, NewJob};

/// A site registered for metadata augmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// Store-assigned identifier.
    pub id: i64,
    /// Registered hostname, stored lowercase.
    pub hostname: String,
    /// Number of completed analyses for this domain.
    pub pages_analyzed: u64,
    /// When the most recent analysis completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_analyzed: Option<DateTime<Utc>>,
}

/// Durable record of analysis attempts.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts a new pending job and returns the stored row.
    async fn create(&self, job: NewJob) -> Result<AnalysisJob, StoreError>;

    /// Fetches a job by id.
    async fn get(&self, id: i64) -> Result<Option<AnalysisJob>, StoreError>;

    /// Applies a partial update and returns the new row.
    ///
    /// See [`JobUpdate`] for the outcome-field consistency rules applied on
    /// status transitions. `updated_at` is always bumped.
    async fn update(&self, id: i64, update: JobUpdate) -> Result<AnalysisJob, StoreError>;

    /// All jobs belonging to a domain.
    async fn jobs_for_domain(&self, domain_id: i64) -> Result<Vec<AnalysisJob>, StoreError>;

    /// The most recent `limit` jobs for a domain, newest first.
    async fn recent_jobs(&self, domain_id: i64, limit: usize)
        -> Result<Vec<AnalysisJob>, StoreError>;

    /// Failed jobs that still have retry budget.
    async fn retryable_jobs(&self, max_retries: u32) -> Result<Vec<AnalysisJob>, StoreError>;
}

/// Domain aggregate operations available to the pipeline.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Fetches a domain by id.
    async fn get(&self, id: i64) -> Result<Option<Domain>, StoreError>;

    /// Fetches a domain by hostname. Lookup is case-insensitive.
    async fn get_by_hostname(&self, hostname: &str) -> Result<Option<Domain>, StoreError>;

    /// Adds one to the domain's analyzed-page counter.
    async fn increment_analyzed(&self, id: i64) -> Result<(), StoreError>;

    /// Stamps the most recent completed analysis.
    async fn set_last_analyzed(&self, id: i64, at: DateTime<Utc>) -> Result<(), StoreError>;
}
