//! Job lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an analysis job.
///
/// Transitions run `Pending → Processing → Completed | Failed`. A failed job
/// re-enters `Pending` when the retry sweep re-queues it, until the retry cap
/// is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Queued, not yet picked up by the worker.
    Pending,
    /// The worker is running the analyzer for this job.
    Processing,
    /// Metadata was generated and published.
    Completed,
    /// The most recent attempt failed.
    Failed,
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl JobStatus {
    /// Returns true once an attempt has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true while the job occupies the queue or the worker.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Pending.to_string(), "pending");
        assert_eq!(JobStatus::Processing.to_string(), "processing");
        assert_eq!(JobStatus::Completed.to_string(), "completed");
        assert_eq!(JobStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_status_serialize() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, r#""processing""#);

        let deserialized: JobStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, JobStatus::Processing);
    }

    #[test]
    fn test_status_is_settled() {
        assert!(JobStatus::Completed.is_settled());
        assert!(JobStatus::Failed.is_settled());
        assert!(!JobStatus::Pending.is_settled());
        assert!(!JobStatus::Processing.is_settled());
    }

    #[test]
    fn test_status_is_live() {
        assert!(JobStatus::Pending.is_live());
        assert!(JobStatus::Processing.is_live());
        assert!(!JobStatus::Completed.is_live());
        assert!(!JobStatus::Failed.is_live());
    }

    #[test]
    fn test_status_default() {
        assert_eq!(JobStatus::default(), JobStatus::Pending);
    }
}
