//! OpenAI-backed analyzer provider.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::schema::JsonLd;
use super::{build_prompt, AnalysisOutcome, ContentAnalyzer, SYSTEM_INSTRUCTION};
use crate::config::OpenAiConfig;
use crate::errors::AnalyzerError;
use crate::observability::SpanTimer;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Analyzer provider calling the OpenAI chat-completions API.
pub struct OpenAiAnalyzer {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiAnalyzer {
    /// Creates a provider from configuration.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Extracts the generated document from a chat-completions response body.
    pub(crate) fn parse_response(body: &Value) -> Result<JsonLd, AnalyzerError> {
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AnalyzerError::MalformedResponse("missing message content".to_string())
            })?;

        let value: Value = serde_json::from_str(content)
            .map_err(|e| AnalyzerError::MalformedResponse(format!("content is not JSON: {e}")))?;

        JsonLd::new(value)
    }
}

#[async_trait]
impl ContentAnalyzer for OpenAiAnalyzer {
    async fn generate(&self, content: &str, url: &str) -> Result<AnalysisOutcome, AnalyzerError> {
        if !self.is_configured() {
            return Err(AnalyzerError::NotConfigured {
                provider: self.provider_name().to_string(),
            });
        }

        let timer = SpanTimer::start("openai.generate");
        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": build_prompt(content, url) },
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.3,
            "max_tokens": 1500,
        });

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.config.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AnalyzerError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzerError::Request(format!(
                "openai returned HTTP {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::MalformedResponse(e.to_string()))?;
        let metadata = Self::parse_response(&body)?;

        tracing::debug!(model = %self.config.model, url, "openai analysis succeeded");
        Ok(AnalysisOutcome {
            metadata,
            confidence: 0.9,
            processing_time_ms: timer.finish(),
        })
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
