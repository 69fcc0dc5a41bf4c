//! Gemini-backed analyzer provider.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::schema::JsonLd;
use super::{build_prompt, AnalysisOutcome, ContentAnalyzer, SYSTEM_INSTRUCTION};
use crate::config::GeminiConfig;
use crate::errors::AnalyzerError;
use crate::observability::SpanTimer;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Analyzer provider calling the Gemini `generateContent` API.
pub struct GeminiAnalyzer {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiAnalyzer {
    /// Creates a provider from configuration.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.config.model)
    }

    /// Extracts the generated document from a `generateContent` response body.
    pub(crate) fn parse_response(body: &Value) -> Result<JsonLd, AnalyzerError> {
        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AnalyzerError::MalformedResponse("missing candidate text".to_string())
            })?;

        let value: Value = serde_json::from_str(text)
            .map_err(|e| AnalyzerError::MalformedResponse(format!("candidate is not JSON: {e}")))?;

        JsonLd::new(value)
    }
}

#[async_trait]
impl ContentAnalyzer for GeminiAnalyzer {
    async fn generate(&self, content: &str, url: &str) -> Result<AnalysisOutcome, AnalyzerError> {
        if !self.is_configured() {
            return Err(AnalyzerError::NotConfigured {
                provider: self.provider_name().to_string(),
            });
        }

        let timer = SpanTimer::start("gemini.generate");
        let payload = json!({
            "system_instruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "parts": [{ "text": build_prompt(content, url) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json"
            },
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AnalyzerError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzerError::Request(format!(
                "gemini returned HTTP {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::MalformedResponse(e.to_string()))?;
        let metadata = Self::parse_response(&body)?;

        tracing::debug!(model = %self.config.model, url, "gemini analysis succeeded");
        Ok(AnalysisOutcome {
            metadata,
            confidence: 0.85,
            processing_time_ms: timer.finish(),
        })
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> GeminiAnalyzer {
        GeminiAnalyzer::new(GeminiConfig {
            api_key: "test-key".to_string(),
            ..GeminiConfig::default()
        })
    }

    #[test]
    fn test_is_configured() {
        assert!(configured().is_configured());
        assert!(!GeminiAnalyzer::new(GeminiConfig::default()).is_configured());
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(configured().provider_name(), "gemini");
    }

    #[test]
    fn test_endpoint_uses_model() {
        let analyzer = configured();
        assert!(analyzer.endpoint().ends_with("gemini-2.5-flash:generateContent"));
    }

    #[tokio::test]
    async fn test_unconfigured_generate_fails_fast() {
        let analyzer = GeminiAnalyzer::new(GeminiConfig::default());
        let err = analyzer.generate("content", "https://example.com").await;
        assert!(matches!(err, Err(AnalyzerError::NotConfigured { .. })));
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": r#"{"@context":"https://schema.org","@type":"WebPage"}"#
                    }]
                }
            }]
        });

        let document = GeminiAnalyzer::parse_response(&body).unwrap();
        assert_eq!(document.type_name(), "WebPage");
    }

    #[test]
    fn test_parse_response_missing_candidates() {
        let err = GeminiAnalyzer::parse_response(&json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_response_invalid_schema() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": r#"{"@type":"WebPage"}"# }] }
            }]
        });
        let err = GeminiAnalyzer::parse_response(&body).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidSchema(_)));
    }
}
