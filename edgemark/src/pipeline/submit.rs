//! Job submission boundary.
//!
//! The edge interceptor consumes [`JobSubmitter`]; [`QueuedSubmitter`] is the
//! in-process implementation coupling the pipeline with the work queue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::AnalysisPipeline;
use crate::errors::SubmitError;
use crate::queue::QueueHandle;

/// Payload accepted at the submission boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Absolute page URL.
    pub url: String,
    /// Page body captured at miss time.
    pub html_content: String,
    /// Owning domain, resolved from the URL host when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<i64>,
}

impl SubmitRequest {
    /// Creates a submission for a URL and captured body.
    #[must_use]
    pub fn new(url: impl Into<String>, html_content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html_content: html_content.into(),
            domain_id: None,
        }
    }

    /// Pins the owning domain explicitly.
    #[must_use]
    pub fn with_domain(mut self, domain_id: i64) -> Self {
        self.domain_id = Some(domain_id);
        self
    }
}

/// Acknowledgement returned for an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Identifier of the job that will serve this URL.
    pub job_id: i64,
    /// Boundary status string, always `"accepted"`.
    pub status: String,
}

impl SubmitReceipt {
    pub(crate) fn accepted(job_id: i64) -> Self {
        Self {
            job_id,
            status: "accepted".to_string(),
        }
    }
}

/// Boundary consumed by the edge interceptor to request analysis.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Validates and records a submission, returning its job id.
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitReceipt, SubmitError>;
}

/// Submitter that persists the job and hands it to the work queue.
pub struct QueuedSubmitter {
    pipeline: Arc<AnalysisPipeline>,
    queue: QueueHandle,
}

impl QueuedSubmitter {
    /// Couples a pipeline with a queue handle.
    #[must_use]
    pub fn new(pipeline: Arc<AnalysisPipeline>, queue: QueueHandle) -> Self {
        Self { pipeline, queue }
    }
}

#[async_trait]
impl JobSubmitter for QueuedSubmitter {
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitReceipt, SubmitError> {
        let submission = self.pipeline.submit(request).await?;
        if submission.newly_created {
            self.queue
                .enqueue(submission.job.id)
                .map_err(|_| SubmitError::QueueClosed)?;
        }
        Ok(SubmitReceipt::accepted(submission.job.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_builder() {
        let request = SubmitRequest::new("https://example.com/a", "<html></html>").with_domain(7);
        assert_eq!(request.url, "https://example.com/a");
        assert_eq!(request.domain_id, Some(7));
    }

    #[test]
    fn test_receipt_shape() {
        let receipt = SubmitReceipt::accepted(42);
        assert_eq!(receipt.job_id, 42);
        assert_eq!(receipt.status, "accepted");

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["job_id"], 42);
        assert_eq!(json["status"], "accepted");
    }
}
