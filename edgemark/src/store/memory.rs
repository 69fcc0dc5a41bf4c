//! In-memory store implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::{Domain, DomainStore, JobStore};
use crate::errors::StoreError;
use crate::job::{AnalysisJob, JobStatus, JobUpdate, NewJob};

/// `DashMap`-backed job store with atomic id assignment.
#[derive(Debug)]
pub struct InMemoryJobStore {
    jobs: DashMap<i64, AnalysisJob>,
    next_id: AtomicI64,
}

impl InMemoryJobStore {
    /// Creates an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the store holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Rewrites a job's `updated_at`, for exercising the backoff gate in
    /// tests.
    pub fn backdate(&self, id: i64, updated_at: DateTime<Utc>) {
        if let Some(mut job) = self.jobs.get_mut(&id) {
            job.updated_at = updated_at;
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_update(job: &mut AnalysisJob, update: JobUpdate) {
    if let Some(status) = update.status {
        job.status = status;
        match status {
            JobStatus::Pending | JobStatus::Processing => {
                job.generated_metadata = None;
                job.error_message = None;
            }
            JobStatus::Completed => job.error_message = None,
            JobStatus::Failed => job.generated_metadata = None,
        }
    }
    if let Some(metadata) = update.generated_metadata {
        job.generated_metadata = Some(metadata);
    }
    if let Some(message) = update.error_message {
        job.error_message = Some(message);
    }
    if let Some(ms) = update.processing_time_ms {
        job.processing_time_ms = Some(ms);
    }
    if let Some(count) = update.retry_count {
        job.retry_count = count;
    }
    job.updated_at = Utc::now();
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: NewJob) -> Result<AnalysisJob, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let row = AnalysisJob {
            id,
            domain_id: job.domain_id,
            url: job.url,
            html_content: job.html_content,
            status: JobStatus::Pending,
            generated_metadata: None,
            error_message: None,
            processing_time_ms: None,
            retry_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.jobs.insert(id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<AnalysisJob>, StoreError> {
        Ok(self.jobs.get(&id).map(|job| job.value().clone()))
    }

    async fn update(&self, id: i64, update: JobUpdate) -> Result<AnalysisJob, StoreError> {
        let mut entry = self
            .jobs
            .get_mut(&id)
            .ok_or(StoreError::JobNotFound { id })?;
        apply_update(entry.value_mut(), update);
        Ok(entry.value().clone())
    }

    async fn jobs_for_domain(&self, domain_id: i64) -> Result<Vec<AnalysisJob>, StoreError> {
        Ok(self
            .jobs
            .iter()
            .filter(|entry| entry.value().domain_id == domain_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn recent_jobs(
        &self,
        domain_id: i64,
        limit: usize,
    ) -> Result<Vec<AnalysisJob>, StoreError> {
        let mut jobs = self.jobs_for_domain(domain_id).await?;
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn retryable_jobs(&self, max_retries: u32) -> Result<Vec<AnalysisJob>, StoreError> {
        Ok(self
            .jobs
            .iter()
            .filter(|entry| {
                let job = entry.value();
                job.status == JobStatus::Failed && job.retry_count < max_retries
            })
            .map(|entry| entry.value().clone())
            .collect())
    }
}

/// `DashMap`-backed domain store.
#[derive(Debug)]
pub struct InMemoryDomainStore {
    domains: DashMap<i64, Domain>,
    next_id: AtomicI64,
}

impl InMemoryDomainStore {
    /// Creates an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            domains: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Registers a hostname and returns the new aggregate.
    pub fn insert(&self, hostname: &str) -> Domain {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let domain = Domain {
            id,
            hostname: hostname.to_ascii_lowercase(),
            pages_analyzed: 0,
            last_analyzed: None,
        };
        self.domains.insert(id, domain.clone());
        domain
    }
}

impl Default for InMemoryDomainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainStore for InMemoryDomainStore {
    async fn get(&self, id: i64) -> Result<Option<Domain>, StoreError> {
        Ok(self.domains.get(&id).map(|domain| domain.value().clone()))
    }

    async fn get_by_hostname(&self, hostname: &str) -> Result<Option<Domain>, StoreError> {
        let needle = hostname.to_ascii_lowercase();
        Ok(self
            .domains
            .iter()
            .find(|entry| entry.value().hostname == needle)
            .map(|entry| entry.value().clone()))
    }

    async fn increment_analyzed(&self, id: i64) -> Result<(), StoreError> {
        let mut entry = self
            .domains
            .get_mut(&id)
            .ok_or(StoreError::DomainNotFound { id })?;
        entry.value_mut().pages_analyzed += 1;
        Ok(())
    }

    async fn set_last_analyzed(&self, id: i64, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut entry = self
            .domains
            .get_mut(&id)
            .ok_or(StoreError::DomainNotFound { id })?;
        entry.value_mut().last_analyzed = Some(at);
        Ok(())
    }
}
