//! Error types for the edgemark delivery pipeline.
//!
//! Failures are grouped by where they surface: submission, analyzer calls,
//! persistence, the edge cache, and origin fetches. Request-path faults are
//! never propagated to clients; pipeline faults are recorded on job rows and
//! retried by the sweep.

use thiserror::Error;

/// The umbrella error type for edgemark operations.
#[derive(Debug, Error)]
pub enum EdgemarkError {
    /// A job submission was rejected.
    #[error("{0}")]
    Submit(#[from] SubmitError),

    /// A content-analyzer invocation failed.
    #[error("{0}")]
    Analyzer(#[from] AnalyzerError),

    /// A job or domain store operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// An edge cache operation failed.
    #[error("{0}")]
    Cache(#[from] CacheError),

    /// An origin fetch failed.
    #[error("{0}")]
    Origin(#[from] OriginError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors rejecting a job submission before any job row exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The URL could not be parsed into a host.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },

    /// No registered domain matches the URL's host.
    #[error("Unknown domain for host: {host}")]
    UnknownDomain {
        /// The unresolvable host.
        host: String,
    },

    /// The submission payload is unusable.
    #[error("Malformed submission: {0}")]
    Malformed(String),

    /// The work queue has shut down.
    #[error("Work queue is closed")]
    QueueClosed,

    /// The submission failed inside the store layer.
    #[error("Submission failed: {0}")]
    Internal(String),
}

/// Failures of a content-analyzer invocation.
///
/// Every variant consumes retry budget, including missing configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzerError {
    /// The active provider has no usable credentials.
    #[error("Analyzer provider not configured: {provider}")]
    NotConfigured {
        /// The selected provider name.
        provider: String,
    },

    /// The provider call exceeded its deadline.
    #[error("Analyzer deadline exceeded after {seconds}s")]
    DeadlineExceeded {
        /// The enforced deadline.
        seconds: u64,
    },

    /// The provider transport failed.
    #[error("Analyzer request failed: {0}")]
    Request(String),

    /// The provider returned an unparseable body.
    #[error("Malformed analyzer response: {0}")]
    MalformedResponse(String),

    /// The returned document is not valid Schema.org JSON-LD.
    #[error("Invalid structured data: {0}")]
    InvalidSchema(String),
}

/// Job and domain store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No job with the given id.
    #[error("Job not found: {id}")]
    JobNotFound {
        /// The missing job id.
        id: i64,
    },

    /// No domain with the given id.
    #[error("Domain not found: {id}")]
    DomainNotFound {
        /// The missing domain id.
        id: i64,
    },

    /// Backend-specific failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Edge cache failures. These are logged on the request path, never served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cache error: {0}")]
pub struct CacheError(pub String);

/// Origin fetch failures, the only edge-path error a caller observes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OriginError {
    /// The origin did not answer within the configured timeout.
    #[error("Origin timed out: {url}")]
    Timeout {
        /// The requested URL.
        url: String,
    },

    /// The origin connection could not be established.
    #[error("Origin unreachable: {url}")]
    Unreachable {
        /// The requested URL.
        url: String,
    },

    /// Any other transport failure.
    #[error("Origin fetch failed: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_display() {
        let err = SubmitError::UnknownDomain {
            host: "example.com".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown domain for host: example.com");

        let err = SubmitError::InvalidUrl {
            url: "not-a-url".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid URL: not-a-url");
    }

    #[test]
    fn test_analyzer_error_display() {
        let err = AnalyzerError::NotConfigured {
            provider: "gemini".to_string(),
        };
        assert_eq!(err.to_string(), "Analyzer provider not configured: gemini");

        let err = AnalyzerError::DeadlineExceeded { seconds: 90 };
        assert_eq!(err.to_string(), "Analyzer deadline exceeded after 90s");
    }

    #[test]
    fn test_umbrella_conversions() {
        let err: EdgemarkError = StoreError::JobNotFound { id: 7 }.into();
        assert_eq!(err.to_string(), "Job not found: 7");

        let err: EdgemarkError = CacheError("boom".to_string()).into();
        assert_eq!(err.to_string(), "Cache error: boom");
    }

    #[test]
    fn test_origin_error_display() {
        let err = OriginError::Timeout {
            url: "https://example.com".to_string(),
        };
        assert_eq!(err.to_string(), "Origin timed out: https://example.com");
    }
}
