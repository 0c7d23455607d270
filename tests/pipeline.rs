//! Integration tests for the summarisation backends and orchestrator.
//!
//! A scripted `ChatTransport` stands in for the network, so these run
//! offline and without API keys. Retry timing runs on tokio's paused clock.

use async_trait::async_trait;
use edgequake_papersum::{
    summarize_text, ChatRequest, ChatTransport, CompletionOutcome, Engine, ErrorKind, Level,
    ProviderConfig, Stage, SummarizerConfig, SummaryError, SummaryProgressCallback,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Replays a fixed list of outcomes and records every request.
#[derive(Default)]
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<CompletionOutcome>>,
    fallback: Option<CompletionOutcome>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    fn replay(outcomes: Vec<CompletionOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        })
    }

    /// Return `outcome` for every call.
    fn always(outcome: CompletionOutcome) -> Arc<Self> {
        Arc::new(Self {
            fallback: Some(outcome),
            ..Default::default()
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, request: &ChatRequest) -> CompletionOutcome {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| CompletionOutcome::OtherFailure("script exhausted".into()))
    }
}

#[derive(Default)]
struct RecordingProgress {
    stages: Mutex<Vec<Stage>>,
    chunks: Mutex<Vec<(usize, usize)>>,
    retries: Mutex<Vec<(u32, Duration)>>,
}

impl SummaryProgressCallback for RecordingProgress {
    fn on_stage(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn on_chunk_complete(&self, index: usize, total: usize) {
        self.chunks.lock().unwrap().push((index, total));
    }

    fn on_retry(&self, attempt: u32, _max_attempts: u32, delay: Duration) {
        self.retries.lock().unwrap().push((attempt, delay));
    }
}

fn config_with(transport: Arc<ScriptedTransport>) -> SummarizerConfig {
    SummarizerConfig::builder()
        .groq(ProviderConfig::groq("gsk-test"))
        .openai(ProviderConfig::openai("sk-test"))
        .transport(transport)
        .build()
        .unwrap()
}

const PAPER_TEXT: &str = "Deep learning has transformed computer vision.";

// ── Provider A (groq) ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_groq_short_summary_single_call() {
    let transport = ScriptedTransport::replay(vec![CompletionOutcome::Success(
        "Deep learning reshaped vision.".into(),
    )]);
    let config = config_with(transport.clone());

    let summary = summarize_text(PAPER_TEXT, Level::Short, Engine::Groq, &config)
        .await
        .unwrap();
    assert_eq!(summary, "Deep learning reshaped vision.");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.model, "llama-3.3-70b-versatile");
    assert_eq!(req.messages[0].role, "system");
    assert_eq!(
        req.messages[0].content,
        "You are a helpful summarization assistant."
    );
    assert_eq!(
        req.messages[1].content,
        format!("Give a one-sentence TL;DR summary:\n\n{PAPER_TEXT}")
    );
    assert_eq!(req.temperature, 0.3);
    assert_eq!(req.max_tokens, 140);
}

#[tokio::test]
async fn test_groq_oversized_text_is_chunked_in_order() {
    let text: String = (0..10_000).map(|i| (b'a' + (i % 26) as u8) as char).collect();
    let mut script = vec![CompletionOutcome::PayloadTooLarge];
    script.extend((1..=20).map(|i| CompletionOutcome::Success(format!("s{i}"))));
    let transport = ScriptedTransport::replay(script);

    let progress = Arc::new(RecordingProgress::default());
    let config = SummarizerConfig::builder()
        .groq(ProviderConfig::groq("gsk-test"))
        .transport(transport.clone())
        .progress_callback(progress.clone())
        .build()
        .unwrap();

    let summary = summarize_text(&text, Level::Medium, Engine::Groq, &config)
        .await
        .unwrap();

    let expected: Vec<String> = (1..=20).map(|i| format!("s{i}")).collect();
    assert_eq!(summary, expected.join(" "));

    let requests = transport.requests();
    assert_eq!(requests.len(), 21);
    let rebuilt: String = requests[1..]
        .iter()
        .map(|r| r.messages[1].content.clone())
        .collect();
    assert_eq!(rebuilt, text, "chunks carry the raw text, in order");
    assert!(requests[1..]
        .iter()
        .all(|r| r.messages[1].content.chars().count() == 500));

    let chunks = progress.chunks.lock().unwrap();
    assert_eq!(chunks.len(), 20);
    assert_eq!(chunks[19], (20, 20));
}

#[tokio::test]
async fn test_groq_rate_limit_also_triggers_chunking() {
    let transport = ScriptedTransport::replay(vec![
        CompletionOutcome::RateLimited,
        CompletionOutcome::Success("only chunk".into()),
    ]);
    let config = config_with(transport.clone());

    let summary = summarize_text(PAPER_TEXT, Level::Long, Engine::Groq, &config)
        .await
        .unwrap();
    assert_eq!(summary, "only chunk");
    assert_eq!(transport.requests()[1].messages[1].content, PAPER_TEXT);
}

#[tokio::test]
async fn test_groq_other_failure_is_provider_error() {
    let transport =
        ScriptedTransport::replay(vec![CompletionOutcome::OtherFailure("HTTP 500".into())]);
    let config = config_with(transport.clone());

    let err = summarize_text(PAPER_TEXT, Level::Short, Engine::Groq, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::Provider { ref provider, .. } if provider == "groq"));
    assert_eq!(err.kind(), ErrorKind::ProcessingFailure);
    assert_eq!(transport.requests().len(), 1);
}

// ── Provider B (openai) ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_openai_exhausts_retries_with_backoff() {
    let transport = ScriptedTransport::always(CompletionOutcome::RateLimited);
    let progress = Arc::new(RecordingProgress::default());
    let config = SummarizerConfig::builder()
        .openai(ProviderConfig::openai("sk-test"))
        .transport(transport.clone())
        .progress_callback(progress.clone())
        .build()
        .unwrap();

    let start = tokio::time::Instant::now();
    let err = summarize_text(PAPER_TEXT, Level::Short, Engine::OpenAi, &config)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(
        err,
        SummaryError::RateLimitExceeded { attempts: 5, .. }
    ));
    assert_eq!(transport.requests().len(), 5);
    assert!(elapsed >= Duration::from_secs(75) && elapsed < Duration::from_secs(76));

    let delays: Vec<u64> = progress
        .retries
        .lock()
        .unwrap()
        .iter()
        .map(|(_, d)| d.as_secs())
        .collect();
    assert_eq!(delays, vec![5, 10, 20, 40]);
}

#[tokio::test(start_paused = true)]
async fn test_openai_succeeds_after_rate_limit() {
    let transport = ScriptedTransport::replay(vec![
        CompletionOutcome::RateLimited,
        CompletionOutcome::Success("Recovered.".into()),
    ]);
    let config = config_with(transport.clone());

    let summary = summarize_text(PAPER_TEXT, Level::Medium, Engine::OpenAi, &config)
        .await
        .unwrap();
    assert_eq!(summary, "Recovered.");
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1], "retries resend the same request");
    assert_eq!(requests[0].model, "gpt-3.5-turbo");
}

#[tokio::test]
async fn test_openai_other_failure_is_not_retried() {
    let transport =
        ScriptedTransport::replay(vec![CompletionOutcome::OtherFailure("HTTP 401".into())]);
    let config = config_with(transport.clone());

    let err = summarize_text(PAPER_TEXT, Level::Short, Engine::OpenAi, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::Provider { ref provider, .. } if provider == "openai"));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_openai_payload_too_large_is_not_chunked() {
    let transport = ScriptedTransport::replay(vec![CompletionOutcome::PayloadTooLarge]);
    let config = config_with(transport.clone());

    let err = summarize_text(&"x".repeat(2_000), Level::Long, Engine::OpenAi, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::Provider { .. }));
    assert_eq!(transport.requests().len(), 1);
}

// ── Orchestrator-level checks ────────────────────────────────────────────────

#[test]
fn test_invalid_engine_string_is_bad_input() {
    let err = "anthropic".parse::<Engine>().unwrap_err();
    assert!(matches!(err, SummaryError::InvalidEngine { .. }));
    assert_eq!(err.kind(), ErrorKind::BadInput);

    let err = "huge".parse::<Level>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);
}

#[test]
fn test_summarize_text_from_blocking_context() {
    let transport = ScriptedTransport::replay(vec![CompletionOutcome::Success("ok".into())]);
    let progress = Arc::new(RecordingProgress::default());
    let config = SummarizerConfig::builder()
        .transport(transport)
        .progress_callback(progress.clone())
        .build()
        .unwrap();

    let summary =
        tokio_test::block_on(summarize_text(PAPER_TEXT, Level::Short, Engine::Groq, &config))
            .unwrap();
    assert_eq!(summary, "ok");
    assert_eq!(*progress.stages.lock().unwrap(), vec![Stage::Summarizing]);
}

#[tokio::test]
async fn test_missing_credentials_without_transport() {
    let config = SummarizerConfig::default();
    let err = summarize_text(PAPER_TEXT, Level::Short, Engine::Groq, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::ProviderNotConfigured { .. }));
}
