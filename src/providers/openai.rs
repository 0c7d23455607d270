use super::{build_request, ChatTransport, CompletionOutcome, SummaryBackend};
use crate::config::{Level, SummarizerConfig};
use crate::error::SummaryError;
use crate::progress::ProgressCallback;
use crate::prompts;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const NAME: &str = "openai";

/// Summarises the whole text, retrying with exponential backoff while the
/// provider reports rate limiting.
pub struct OpenAiBackend {
    transport: Arc<dyn ChatTransport>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_attempts: u32,
    retry_backoff: Duration,
    progress: Option<ProgressCallback>,
}

impl OpenAiBackend {
    pub fn new(transport: Arc<dyn ChatTransport>, model: String, config: &SummarizerConfig) -> Self {
        Self {
            transport,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_attempts: config.max_attempts,
            retry_backoff: config.retry_backoff,
            progress: config.progress_callback.clone(),
        }
    }

    /// Delay after rate-limited attempt `attempt` (1-indexed).
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(2u32.saturating_pow(attempt - 1))
    }
}

#[async_trait]
impl SummaryBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn summarize(&self, text: &str, level: Level) -> Result<String, SummaryError> {
        let request = build_request(
            &self.model,
            prompts::user_message(level, text),
            self.temperature,
            self.max_tokens,
        );

        for attempt in 1..=self.max_attempts {
            match self.transport.complete(&request).await {
                CompletionOutcome::Success(summary) => {
                    debug!("Attempt {}: {} chars", attempt, summary.len());
                    return Ok(summary);
                }
                CompletionOutcome::RateLimited => {
                    if attempt == self.max_attempts {
                        break;
                    }
                    let delay = self.backoff(attempt);
                    warn!(
                        "Rate limited: retry {}/{} after {}s",
                        attempt, self.max_attempts, delay.as_secs()
                    );
                    if let Some(cb) = &self.progress {
                        cb.on_retry(attempt, self.max_attempts, delay);
                    }
                    sleep(delay).await;
                }
                CompletionOutcome::PayloadTooLarge => {
                    return Err(SummaryError::Provider {
                        provider: NAME.into(),
                        message: "request too large for the model".into(),
                    })
                }
                CompletionOutcome::OtherFailure(detail) => {
                    return Err(SummaryError::Provider {
                        provider: NAME.into(),
                        message: detail,
                    })
                }
            }
        }

        Err(SummaryError::RateLimitExceeded {
            provider: NAME.into(),
            attempts: self.max_attempts,
        })
    }
}
