//! Injected configuration for the delivery pipeline.
//!
//! The active analyzer provider, retry policy, and edge settings are resolved
//! once at startup and passed into components by reference; nothing reads
//! ambient global state after construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Which content-analyzer implementation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat-completions provider.
    OpenAi,
    /// Google Gemini provider.
    #[default]
    Gemini,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Error for provider names outside the supported set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported analyzer provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Credentials and model selection for the OpenAI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key; empty means the provider is unconfigured.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
        }
    }
}

/// Credentials and model selection for the Gemini provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; empty means the provider is unconfigured.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
        }
    }
}

/// Provider selection plus per-provider settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The active provider.
    #[serde(default)]
    pub active: ProviderKind,
    /// OpenAI settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Gemini settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl ProviderConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the active provider.
    #[must_use]
    pub fn with_active(mut self, kind: ProviderKind) -> Self {
        self.active = kind;
        self
    }
}

/// Retry policy applied to failed analysis jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum failed attempts before a job is terminally failed.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay in seconds; a job failed `k` times waits `base * 2^k`.
    #[serde(default = "default_base_delay")]
    pub base_delay_secs: u64,
    /// Upper bound on the computed delay.
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
    /// Interval between retry sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    1
}

fn default_max_delay() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay(),
            max_delay_secs: default_max_delay(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retry cap.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the sweep interval.
    #[must_use]
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    /// The delay a job must sit out after its `retry_count`-th failure.
    #[must_use]
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        let exp = self
            .base_delay_secs
            .saturating_mul(2u64.saturating_pow(retry_count));
        Duration::from_secs(exp.min(self.max_delay_secs))
    }

    /// The sweep interval as a `Duration`.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Edge interceptor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Timeout for a whole origin fetch.
    #[serde(default = "default_origin_timeout")]
    pub origin_timeout_secs: u64,
    /// Timeout for establishing the origin connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// User agent presented to the origin.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_origin_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "edgemark/0.1".to_string()
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            origin_timeout_secs: default_origin_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl EdgeConfig {
    /// The origin fetch timeout as a `Duration`.
    #[must_use]
    pub fn origin_timeout(&self) -> Duration {
        Duration::from_secs(self.origin_timeout_secs)
    }
}

/// Analyzer invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Character bound on the sanitized content sent to the analyzer.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Deadline for one analyzer invocation.
    #[serde(default = "default_analyzer_timeout")]
    pub analyzer_timeout_secs: u64,
}

fn default_max_content_chars() -> usize {
    8000
}

fn default_analyzer_timeout() -> u64 {
    90
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            analyzer_timeout_secs: default_analyzer_timeout(),
        }
    }
}

impl AnalysisConfig {
    /// The analyzer deadline as a `Duration`.
    #[must_use]
    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.analyzer_timeout_secs)
    }
}

/// Top-level configuration aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgemarkConfig {
    /// Provider selection and credentials.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Retry policy for failed jobs.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Edge interceptor settings.
    #[serde(default)]
    pub edge: EdgeConfig,
    /// Analyzer invocation settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl EdgemarkConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads provider selection and credentials from the environment.
    ///
    /// Recognized variables: `LLM_PROVIDER`, `OPENAI_API_KEY`,
    /// `OPENAI_MODEL`, `GEMINI_API_KEY`, `GEMINI_MODEL`. Anything absent
    /// keeps its default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            match provider.parse() {
                Ok(kind) => config.provider.active = kind,
                Err(error) => tracing::warn!(%error, "ignoring LLM_PROVIDER"),
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.provider.openai.api_key = key;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.provider.openai.model = model;
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.provider.gemini.api_key = key;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.provider.gemini.model = model;
        }

        config
    }
}
