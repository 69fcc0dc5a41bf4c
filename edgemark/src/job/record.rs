//! Job records and their insert/update shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JobStatus;
use crate::analyzer::JsonLd;

/// A single asynchronous analysis attempt for one URL.
///
/// Rows are created by submission, mutated only by the pipeline, and never
/// deleted here; retention is the store owner's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisJob {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning domain.
    pub domain_id: i64,
    /// Absolute URL captured at miss time.
    pub url: String,
    /// Raw page body captured at miss time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Generated document, present iff completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_metadata: Option<JsonLd>,
    /// Failure message, present iff failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Wall-clock duration of the last attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    /// Number of failed attempts so far.
    pub retry_count: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl AnalysisJob {
    /// True once the retry budget is exhausted.
    #[must_use]
    pub fn is_permanently_failed(&self, max_retries: u32) -> bool {
        self.status == JobStatus::Failed && self.retry_count >= max_retries
    }
}

/// Insert shape for a new job row. Jobs always start `Pending`.
#[derive(Debug, Clone)]
pub struct NewJob {
    /// Owning domain.
    pub domain_id: i64,
    /// Absolute URL to analyze.
    pub url: String,
    /// Page body captured at miss time.
    pub html_content: Option<String>,
}

/// Partial update applied by the pipeline or the retry sweep.
///
/// The store bumps `updated_at` on every application and keeps the outcome
/// fields consistent with the new status: entering `Pending` or `Processing`
/// clears metadata and error, `Completed` clears the error, `Failed` clears
/// the metadata.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    /// New lifecycle state, if transitioning.
    pub status: Option<JobStatus>,
    /// Generated document to record.
    pub generated_metadata: Option<JsonLd>,
    /// Failure message to record.
    pub error_message: Option<String>,
    /// Duration of the attempt.
    pub processing_time_ms: Option<u64>,
    /// New failed-attempt count.
    pub retry_count: Option<u32>,
}

impl JobUpdate {
    /// Starts an update transitioning to `status`.
    #[must_use]
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Records the generated document.
    #[must_use]
    pub fn with_metadata(mut self, metadata: JsonLd) -> Self {
        self.generated_metadata = Some(metadata);
        self
    }

    /// Records a failure message.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Records the attempt duration.
    #[must_use]
    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = Some(ms);
        self
    }

    /// Sets the failed-attempt count.
    #[must_use]
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }
}
