//! Edge interceptor: the request-path component.
//!
//! Serves cached structured data instantly and schedules background analysis
//! on cache misses. Any internal fault degrades to pure pass-through; the
//! response a client sees is never worse than the origin's.

mod origin;
mod rewrite;
mod rules;

pub use origin::{HttpOriginClient, OriginClient, OriginResponse};
pub use rewrite::{inject_into_body, inject_json_ld, RewriteError};
pub use rules::SkipRules;

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::MetadataCache;
use crate::errors::OriginError;
use crate::observability::SpanTimer;
use crate::pipeline::{JobSubmitter, SubmitRequest};

/// An inbound HTTP request as seen by the interceptor.
#[derive(Debug, Clone)]
pub struct EdgeRequest {
    /// HTTP method.
    pub method: String,
    /// Fully qualified request URL.
    pub url: String,
    /// Request headers to forward to the origin.
    pub headers: HashMap<String, String>,
    /// Request body, forwarded for pass-through of non-GET methods.
    pub body: Option<Vec<u8>>,
}

impl EdgeRequest {
    /// Creates a GET request for a URL.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Whether this is a GET request.
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// The path component of the request URL, query excluded.
    #[must_use]
    pub fn path(&self) -> &str {
        let rest = self
            .url
            .find("://")
            .map_or(self.url.as_str(), |i| &self.url[i + 3..]);
        match rest.find('/') {
            Some(i) => {
                let path = &rest[i..];
                let end = path.find(['?', '#']).unwrap_or(path.len());
                &path[..end]
            }
            None => "/",
        }
    }
}

/// The request-path component in front of an origin server.
///
/// One instance is shared across any number of concurrent requests; all
/// state lives in the injected collaborators.
pub struct EdgeInterceptor {
    cache: Arc<dyn MetadataCache>,
    origin: Arc<dyn OriginClient>,
    submitter: Arc<dyn JobSubmitter>,
    rules: SkipRules,
}

impl EdgeInterceptor {
    /// Wires the interceptor to its collaborators.
    #[must_use]
    pub fn new(
        cache: Arc<dyn MetadataCache>,
        origin: Arc<dyn OriginClient>,
        submitter: Arc<dyn JobSubmitter>,
    ) -> Self {
        Self {
            cache,
            origin,
            submitter,
            rules: SkipRules::new(),
        }
    }

    /// Replaces the default eligibility rules.
    #[must_use]
    pub fn with_rules(mut self, rules: SkipRules) -> Self {
        self.rules = rules;
        self
    }

    /// Handles one inbound request.
    ///
    /// Only an origin fetch failure surfaces as an error; cache and rewrite
    /// faults are logged and degrade to pass-through.
    pub async fn intercept(&self, request: &EdgeRequest) -> Result<OriginResponse, OriginError> {
        let request_id = Uuid::new_v4();
        let timer = SpanTimer::start("edge.intercept");

        if !self.rules.is_eligible(request) {
            tracing::trace!(%request_id, url = %request.url, "request not eligible, passing through");
            return self.origin.fetch(request).await;
        }

        let cached = match self.cache.get(&request.url).await {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(%request_id, %error, "cache lookup failed, passing through");
                return self.origin.fetch(request).await;
            }
        };

        let response = self.origin.fetch(request).await?;

        let result = match cached {
            Some(document) if response.is_html() => {
                match rewrite::inject_into_body(&response.body, &document) {
                    Ok(body) => {
                        tracing::debug!(%request_id, url = %request.url, "served cached metadata");
                        Ok(OriginResponse { body, ..response })
                    }
                    Err(error) => {
                        tracing::warn!(%request_id, %error, "rewrite failed, serving origin response");
                        Ok(response)
                    }
                }
            }
            // The cached entry is stale for this content type.
            Some(_) => Ok(response),
            None => {
                if response.is_html() {
                    self.schedule_analysis(request_id, &request.url, &response);
                }
                Ok(response)
            }
        };

        tracing::trace!(%request_id, duration_ms = timer.finish(), "request handled");
        result
    }

    /// Schedules a fire-and-forget submission carrying a copy of the body.
    ///
    /// The detached task outlives this request; its outcome is only logged.
    fn schedule_analysis(&self, request_id: Uuid, url: &str, response: &OriginResponse) {
        let html = match response.text() {
            Some(text) => text.to_string(),
            None => {
                tracing::debug!(%request_id, url, "miss body is not text, skipping analysis");
                return;
            }
        };

        let submitter = Arc::clone(&self.submitter);
        let submission = SubmitRequest::new(url, html);
        tokio::spawn(async move {
            match submitter.submit(submission).await {
                Ok(receipt) => {
                    tracing::debug!(%request_id, job_id = receipt.job_id, "analysis scheduled");
                }
                Err(error) => {
                    tracing::warn!(%request_id, %error, "analysis submission failed");
                }
            }
        });
    }
}
