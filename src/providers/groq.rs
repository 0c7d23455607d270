use super::{build_request, ChatTransport, CompletionOutcome, SummaryBackend};
use crate::config::{Level, SummarizerConfig};
use crate::error::SummaryError;
use crate::pipeline::chunk::split_chunks;
use crate::progress::ProgressCallback;
use crate::prompts;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

const NAME: &str = "groq";

/// Summarises the whole text in one call, falling back to per-chunk
/// summaries when the call is rate limited or too large.
pub struct GroqBackend {
    transport: Arc<dyn ChatTransport>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    chunk_size: usize,
    progress: Option<ProgressCallback>,
}

impl GroqBackend {
    pub fn new(transport: Arc<dyn ChatTransport>, model: String, config: &SummarizerConfig) -> Self {
        Self {
            transport,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            chunk_size: config.chunk_size,
            progress: config.progress_callback.clone(),
        }
    }

    /// Summarise each chunk on its own and join the results with a space.
    ///
    /// Chunk messages carry the chunk text only, without the level
    /// instruction. Any chunk failure fails the whole request, and so does
    /// text with nothing to chunk, reporting the whole-text `trigger`.
    async fn summarize_chunks(
        &self,
        text: &str,
        trigger: &CompletionOutcome,
    ) -> Result<String, SummaryError> {
        let chunks = split_chunks(text, self.chunk_size);
        let total = chunks.len();
        if total == 0 {
            return Err(SummaryError::Provider {
                provider: NAME.into(),
                message: format!(
                    "whole-text call {} and there is no text to chunk",
                    describe(trigger)
                ),
            });
        }
        info!("Summarising {} chunks of up to {} chars", total, self.chunk_size);

        let mut summaries = Vec::with_capacity(total);
        for (idx, chunk) in chunks.into_iter().enumerate() {
            let request = build_request(&self.model, chunk, self.temperature, self.max_tokens);
            match self.transport.complete(&request).await {
                CompletionOutcome::Success(summary) => {
                    debug!("Chunk {}/{}: {} chars", idx + 1, total, summary.len());
                    summaries.push(summary);
                    if let Some(cb) = &self.progress {
                        cb.on_chunk_complete(idx + 1, total);
                    }
                }
                other => {
                    return Err(SummaryError::Provider {
                        provider: NAME.into(),
                        message: format!("chunk {}/{} failed: {}", idx + 1, total, describe(&other)),
                    })
                }
            }
        }

        Ok(summaries.join(" "))
    }
}

#[async_trait]
impl SummaryBackend for GroqBackend {
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

        match self.transport.complete(&request).await {
            CompletionOutcome::Success(summary) => Ok(summary),
            outcome @ (CompletionOutcome::RateLimited | CompletionOutcome::PayloadTooLarge) => {
                warn!("Whole-text call {}; falling back to chunks", describe(&outcome));
                self.summarize_chunks(text, &outcome).await
            }
            CompletionOutcome::OtherFailure(detail) => Err(SummaryError::Provider {
                provider: NAME.into(),
                message: detail,
            }),
        }
    }
}

fn describe(outcome: &CompletionOutcome) -> String {
    match outcome {
        CompletionOutcome::Success(_) => "succeeded".into(),
        CompletionOutcome::RateLimited => "rate limited".into(),
        CompletionOutcome::PayloadTooLarge => "payload too large".into(),
        CompletionOutcome::OtherFailure(detail) => detail.clone(),
    }
}
