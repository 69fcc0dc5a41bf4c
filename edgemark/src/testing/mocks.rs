//! Hand-rolled mocks for pipeline and edge tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::analyzer::{AnalysisOutcome, ContentAnalyzer, JsonLd};
use crate::cache::MetadataCache;
use crate::edge::{EdgeRequest, OriginClient, OriginResponse};
use crate::errors::{AnalyzerError, CacheError, OriginError, SubmitError};
use crate::pipeline::{JobSubmitter, SubmitReceipt, SubmitRequest};

/// Scripted analyzer with call counting.
///
/// Scripted steps are consumed front to back; once exhausted, every call
/// returns the fallback outcome.
pub struct MockAnalyzer {
    script: Mutex<VecDeque<Result<JsonLd, AnalyzerError>>>,
    fallback: Result<JsonLd, AnalyzerError>,
    configured: bool,
    fail_rate: f64,
    call_count: AtomicUsize,
}

impl MockAnalyzer {
    /// An analyzer that always succeeds with the given document.
    #[must_use]
    pub fn succeeding(document: JsonLd) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(document),
            configured: true,
            fail_rate: 0.0,
            call_count: AtomicUsize::new(0),
        }
    }

    /// An analyzer that always fails with the given error.
    #[must_use]
    pub fn failing(error: AnalyzerError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(error),
            configured: true,
            fail_rate: 0.0,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Prepends scripted outcomes consumed before the fallback applies.
    #[must_use]
    pub fn with_script(self, steps: Vec<Result<JsonLd, AnalyzerError>>) -> Self {
        *self.script.lock() = steps.into();
        self
    }

    /// Makes a fraction of calls fail randomly.
    #[must_use]
    pub fn with_fail_rate(mut self, rate: f64) -> Self {
        self.fail_rate = rate;
        self
    }

    /// Marks the provider as missing credentials.
    #[must_use]
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Returns the number of `generate` calls observed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentAnalyzer for MockAnalyzer {
    async fn generate(&self, _content: &str, _url: &str) -> Result<AnalysisOutcome, AnalyzerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_rate > 0.0 && rand::thread_rng().gen_bool(self.fail_rate) {
            return Err(AnalyzerError::Request("injected mock failure".to_string()));
        }

        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        step.map(|metadata| AnalysisOutcome {
            metadata,
            confidence: 1.0,
            processing_time_ms: 1,
        })
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// Origin stub serving canned responses keyed by URL.
#[derive(Default)]
pub struct MockOriginClient {
    responses: Mutex<HashMap<String, OriginResponse>>,
    fetched: Mutex<Vec<String>>,
}

impl MockOriginClient {
    /// Creates an empty stub; unknown URLs fail as unreachable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a response for a URL.
    pub fn insert(&self, url: &str, response: OriginResponse) {
        self.responses.lock().insert(url.to_string(), response);
    }

    /// Registers a 200 HTML response for a URL.
    pub fn insert_html(&self, url: &str, body: &str) {
        self.insert(url, OriginResponse::html(body));
    }

    /// URLs fetched so far, in order.
    #[must_use]
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }

    /// Number of fetches observed.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().len()
    }
}

#[async_trait]
impl OriginClient for MockOriginClient {
    async fn fetch(&self, request: &EdgeRequest) -> Result<OriginResponse, OriginError> {
        self.fetched.lock().push(request.url.clone());
        self.responses
            .lock()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| OriginError::Unreachable {
                url: request.url.clone(),
            })
    }
}

/// Captures submissions without running a pipeline.
#[derive(Default)]
pub struct RecordingSubmitter {
    submissions: Mutex<Vec<SubmitRequest>>,
}

impl RecordingSubmitter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions observed so far, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<SubmitRequest> {
        self.submissions.lock().clone()
    }

    /// Number of submissions observed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.submissions.lock().len()
    }
}

#[async_trait]
impl JobSubmitter for RecordingSubmitter {
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitReceipt, SubmitError> {
        let mut submissions = self.submissions.lock();
        submissions.push(request);
        Ok(SubmitReceipt::accepted(submissions.len() as i64))
    }
}

/// Cache whose operations always fail, for degradation tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCache;

#[async_trait]
impl MetadataCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<JsonLd>, CacheError> {
        Err(CacheError("injected cache failure".to_string()))
    }

    async fn put(&self, _key: &str, _value: JsonLd) -> Result<(), CacheError> {
        Err(CacheError("injected cache failure".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_json_ld;

    #[tokio::test]
    async fn test_mock_analyzer_script_then_fallback() {
        let analyzer = MockAnalyzer::succeeding(sample_json_ld()).with_script(vec![Err(
            AnalyzerError::Request("first call fails".to_string()),
        )]);

        assert!(analyzer.generate("c", "u").await.is_err());
        assert!(analyzer.generate("c", "u").await.is_ok());
        assert_eq!(analyzer.call_count(), 2);

        analyzer.reset();
        assert_eq!(analyzer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_origin_records_fetches() {
        let origin = MockOriginClient::new();
        origin.insert_html("https://example.com/a", "<html></html>");

        let ok = origin.fetch(&EdgeRequest::get("https://example.com/a")).await;
        assert!(ok.is_ok());

        let missing = origin.fetch(&EdgeRequest::get("https://example.com/b")).await;
        assert!(matches!(missing, Err(OriginError::Unreachable { .. })));

        assert_eq!(origin.fetch_count(), 2);
        assert_eq!(
            origin.fetched_urls(),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_recording_submitter() {
        let submitter = RecordingSubmitter::new();
        let receipt = submitter
            .submit(SubmitRequest::new("https://example.com/a", "<html></html>"))
            .await
            .unwrap();
        assert_eq!(receipt.status, "accepted");
        assert_eq!(submitter.count(), 1);
    }
}
