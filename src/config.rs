//! Configuration types for PDF summarisation.
//!
//! All pipeline behaviour is controlled through [`SummarizerConfig`], built
//! via its [`SummarizerConfigBuilder`]. Credentials and endpoints live in
//! explicit [`ProviderConfig`] values handed to the builder; the library never
//! reads API keys from the process environment itself, so tests can run with
//! fake credentials and a scripted transport.

use crate::error::SummaryError;
use crate::progress::ProgressCallback;
use crate::providers::ChatTransport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default Groq endpoint (OpenAI-compatible API surface).
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default Groq chat model.
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Default OpenAI endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI chat model.
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Endpoint, model and credential for one chat-completion provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Bearer token sent in the `Authorization` header.
    pub api_key: String,
    /// Base URL without the trailing `/chat/completions`.
    pub base_url: String,
    /// Model identifier sent in the request body.
    pub model: String,
}

impl ProviderConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Groq with the default endpoint and model.
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(api_key, GROQ_BASE_URL, GROQ_DEFAULT_MODEL)
    }

    /// OpenAI with the default endpoint and model.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(api_key, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Configuration for a summarisation run.
///
/// Built via [`SummarizerConfig::builder()`] or using
/// [`SummarizerConfig::default()`] (which has no providers configured and is
/// therefore only useful for [`crate::inspect`]).
///
/// # Example
/// ```rust
/// use edgequake_papersum::{ProviderConfig, SummarizerConfig};
///
/// let config = SummarizerConfig::builder()
///     .groq(ProviderConfig::groq("gsk-test"))
///     .max_tokens(200)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 200);
/// ```
#[derive(Clone)]
pub struct SummarizerConfig {
    /// Groq credentials. Required for [`Engine::Groq`].
    pub groq: Option<ProviderConfig>,

    /// OpenAI credentials. Required for [`Engine::OpenAi`].
    pub openai: Option<ProviderConfig>,

    /// Sampling temperature for every completion. Default: 0.3.
    pub temperature: f32,

    /// Completion length cap in tokens. Default: 140.
    pub max_tokens: u32,

    /// Characters per chunk when the Groq backend falls back to chunked
    /// summarisation. Default: 500.
    pub chunk_size: usize,

    /// Total attempts (first call included) the OpenAI backend makes while
    /// rate limited. Default: 5.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles after each attempt. Default: 5 s.
    pub retry_backoff: Duration,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-completion HTTP timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Pre-constructed transport. Takes precedence over the HTTP transport
    /// built from `groq` / `openai`.
    pub transport: Option<Arc<dyn ChatTransport>>,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            groq: None,
            openai: None,
            temperature: 0.3,
            max_tokens: 140,
            chunk_size: 500,
            max_attempts: 5,
            retry_backoff: Duration::from_secs(5),
            download_timeout_secs: 120,
            api_timeout_secs: 60,
            transport: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("groq", &self.groq)
            .field("openai", &self.openai)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("chunk_size", &self.chunk_size)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff", &self.retry_backoff)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn ChatTransport>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SummaryProgressCallback>"),
            )
            .finish()
    }
}

impl SummarizerConfig {
    /// Create a new builder for `SummarizerConfig`.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Provider settings for `engine`, if configured.
    pub fn provider(&self, engine: Engine) -> Option<&ProviderConfig> {
        match engine {
            Engine::Groq => self.groq.as_ref(),
            Engine::OpenAi => self.openai.as_ref(),
        }
    }
}

/// Builder for [`SummarizerConfig`].
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl fmt::Debug for SummarizerConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl SummarizerConfigBuilder {
    pub fn groq(mut self, provider: ProviderConfig) -> Self {
        self.config.groq = Some(provider);
        self
    }

    pub fn openai(mut self, provider: ProviderConfig) -> Self {
        self.config.openai = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.config.chunk_size = n;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n;
        self
    }

    pub fn retry_backoff(mut self, delay: Duration) -> Self {
        self.config.retry_backoff = delay;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, SummaryError> {
        let c = &self.config;
        if c.chunk_size == 0 {
            return Err(SummaryError::InvalidConfig(
                "Chunk size must be ≥ 1".into(),
            ));
        }
        if c.max_attempts == 0 {
            return Err(SummaryError::InvalidConfig(
                "Max attempts must be ≥ 1".into(),
            ));
        }
        for provider in [&c.groq, &c.openai].into_iter().flatten() {
            if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
                return Err(SummaryError::InvalidConfig(format!(
                    "Provider base URL must be http(s), got '{}'",
                    provider.base_url
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Requested summary length tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// One-sentence TL;DR. (default)
    #[default]
    Short,
    /// Roughly 150 words.
    Medium,
    /// Detailed, up to 500 words.
    Long,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Short, Level::Medium, Level::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Short => "short",
            Level::Medium => "medium",
            Level::Long => "long",
        }
    }
}

impl FromStr for Level {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Level::Short),
            "medium" => Ok(Level::Medium),
            "long" => Ok(Level::Long),
            _ => Err(SummaryError::InvalidLevel {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which chat-completion backend performs the summarisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Groq, with chunked fallback on oversized or rate-limited calls. (default)
    #[default]
    Groq,
    /// OpenAI, with exponential-backoff retry on rate limiting.
    OpenAi,
}

impl Engine {
    pub const ALL: [Engine; 2] = [Engine::Groq, Engine::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Groq => "groq",
            Engine::OpenAi => "openai",
        }
    }
}

impl FromStr for Engine {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(Engine::Groq),
            "openai" => Ok(Engine::OpenAi),
            _ => Err(SummaryError::InvalidEngine {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
