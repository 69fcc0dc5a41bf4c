//! Content-analyzer capability.
//!
//! A single provider is resolved at startup from configuration and injected
//! into the pipeline. Adding a provider means implementing
//! [`ContentAnalyzer`]; the pipeline never branches on provider identity.

mod extract;
mod gemini;
mod openai;
mod schema;

pub use extract::{extract_text, DEFAULT_MAX_CONTENT_CHARS};
pub use gemini::GeminiAnalyzer;
pub use openai::OpenAiAnalyzer;
pub use schema::JsonLd;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ProviderConfig, ProviderKind};
use crate::errors::AnalyzerError;

/// Result of a successful analyzer invocation.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The generated document.
    pub metadata: JsonLd,
    /// Provider-reported confidence in `[0, 1]`.
    pub confidence: f64,
    /// Wall-clock duration of the provider call.
    pub processing_time_ms: u64,
}

/// Capability interface for structured-data generation.
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Generates a Schema.org document for sanitized page content.
    async fn generate(&self, content: &str, url: &str) -> Result<AnalysisOutcome, AnalyzerError>;

    /// Whether the provider has usable credentials.
    fn is_configured(&self) -> bool;

    /// Stable provider identifier.
    fn provider_name(&self) -> &str;
}

/// Builds the analyzer selected by `config.active`.
#[must_use]
pub fn build_analyzer(config: &ProviderConfig) -> Arc<dyn ContentAnalyzer> {
    match config.active {
        ProviderKind::OpenAi => Arc::new(OpenAiAnalyzer::new(config.openai.clone())),
        ProviderKind::Gemini => Arc::new(GeminiAnalyzer::new(config.gemini.clone())),
    }
}

/// System instruction shared by all providers.
pub(crate) const SYSTEM_INSTRUCTION: &str = "You are an expert in Schema.org structured data. \
    Generate accurate JSON-LD markup for web pages. Always respond with valid JSON only.";

/// Builds the user-facing instruction sent to a provider.
#[must_use]
pub(crate) fn build_prompt(content: &str, url: &str) -> String {
    format!(
        "Analyze the following webpage content and generate appropriate Schema.org \
         JSON-LD structured data.\n\n\
         URL: {url}\n\
         Content: {content}\n\n\
         Requirements:\n\
         - Generate valid Schema.org JSON-LD markup\n\
         - Choose the most appropriate schema type (Article, Product, Organization, etc.)\n\
         - Include relevant properties based on the content\n\
         - Ensure the @context is \"https://schema.org\"\n\
         - Return only valid JSON without any markdown formatting\n\n\
         Respond with a JSON object in this format:\n\
         {{\n  \"@context\": \"https://schema.org\",\n  \"@type\": \"...\",\n  ...\n}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, OpenAiConfig};

    #[test]
    fn test_build_prompt_embeds_url_and_content() {
        let prompt = build_prompt("Page text", "https://example.com/a");
        assert!(prompt.contains("URL: https://example.com/a"));
        assert!(prompt.contains("Content: Page text"));
        assert!(prompt.contains("https://schema.org"));
    }

    #[test]
    fn test_build_analyzer_selects_provider() {
        let config = ProviderConfig {
            active: ProviderKind::OpenAi,
            openai: OpenAiConfig {
                api_key: "sk-test".to_string(),
                ..OpenAiConfig::default()
            },
            gemini: GeminiConfig::default(),
        };
        assert_eq!(build_analyzer(&config).provider_name(), "openai");

        let config = ProviderConfig::new().with_active(ProviderKind::Gemini);
        assert_eq!(build_analyzer(&config).provider_name(), "gemini");
    }
}
