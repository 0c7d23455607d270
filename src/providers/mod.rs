//! Chat-completion backends.
//!
//! Two layers:
//!
//! - [`ChatTransport`] sends one request and reports a [`CompletionOutcome`].
//!   [`HttpChatTransport`] is the production implementation; tests inject a
//!   scripted one through [`crate::config::SummarizerConfigBuilder::transport`].
//! - [`SummaryBackend`] turns document text into a summary on top of a
//!   transport, applying the engine's recovery policy: chunked fallback for
//!   [`GroqBackend`], rate-limit retry for [`OpenAiBackend`].
//!
//! Backends only ever switch on the outcome tag, never on provider error
//! strings.

mod groq;
mod http;
mod openai;

pub use groq::GroqBackend;
pub use http::{classify_response, HttpChatTransport};
pub use openai::OpenAiBackend;

use crate::config::{Engine, Level, ProviderConfig, SummarizerConfig};
use crate::error::SummaryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Body of an OpenAI-compatible `chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Result of a single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Text of the first choice.
    Success(String),
    /// The provider asked us to slow down.
    RateLimited,
    /// The request exceeded the provider's size or context limit.
    PayloadTooLarge,
    /// Anything else: auth errors, 5xx, network failures, malformed bodies.
    OtherFailure(String),
}

/// Sends one chat-completion request.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> CompletionOutcome;
}

/// Produces a summary of document text at a given level.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Provider name used in errors and logs.
    fn name(&self) -> &'static str;

    async fn summarize(&self, text: &str, level: Level) -> Result<String, SummaryError>;
}

/// Select and construct the backend for `engine`.
///
/// With a transport override in `config`, provider credentials are optional
/// and the default model is used when none is configured.
pub fn backend_for(
    engine: Engine,
    config: &SummarizerConfig,
) -> Result<Box<dyn SummaryBackend>, SummaryError> {
    let (transport, model) = transport_for(engine, config)?;

    Ok(match engine {
        Engine::Groq => Box::new(GroqBackend::new(transport, model, config)),
        Engine::OpenAi => Box::new(OpenAiBackend::new(transport, model, config)),
    })
}

fn transport_for(
    engine: Engine,
    config: &SummarizerConfig,
) -> Result<(Arc<dyn ChatTransport>, String), SummaryError> {
    let provider = config.provider(engine);

    if let Some(transport) = &config.transport {
        let model = provider
            .map(|p| p.model.clone())
            .unwrap_or_else(|| default_provider(engine).model);
        return Ok((Arc::clone(transport), model));
    }

    let provider = provider
        .filter(|p| !p.api_key.is_empty())
        .ok_or_else(|| SummaryError::ProviderNotConfigured {
            provider: engine.to_string(),
            hint: not_configured_hint(engine).into(),
        })?;

    let transport = HttpChatTransport::new(provider.clone(), config.api_timeout_secs)?;
    Ok((Arc::new(transport), provider.model.clone()))
}

fn default_provider(engine: Engine) -> ProviderConfig {
    match engine {
        Engine::Groq => ProviderConfig::groq(""),
        Engine::OpenAi => ProviderConfig::openai(""),
    }
}

fn not_configured_hint(engine: Engine) -> &'static str {
    match engine {
        Engine::Groq => "Set GROQ_API_KEY or pass --groq-api-key.",
        Engine::OpenAi => "Set OPENAI_API_KEY or pass --openai-api-key.",
    }
}

/// Build the request both backends send for a piece of text.
pub(crate) fn build_request(
    model: &str,
    user_content: String,
    temperature: f32,
    max_tokens: u32,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(crate::prompts::SYSTEM_PROMPT),
            ChatMessage::user(user_content),
        ],
        temperature,
        max_tokens,
    }
}
