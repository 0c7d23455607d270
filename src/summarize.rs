//! Summarisation entry points.
//!
//! [`process`] runs the whole pipeline for one request: resolve the source,
//! pick a backend, extract text and tables, drop the document, summarise.
//! Every stage is fatal on failure and nothing partial is returned.
//! [`summarize_text`] and [`inspect`] expose the two halves on their own.

use crate::config::{Engine, Level, SummarizerConfig};
use crate::error::SummaryError;
use crate::output::{ExtractedContent, SummaryResult};
use crate::pipeline::extract::extract_content;
use crate::pipeline::input::{resolve_source, DocumentSource};
use crate::progress::Stage;
use crate::providers::backend_for;
use std::time::Instant;
use tracing::{debug, info};

/// One summarisation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub source: DocumentSource,
    pub level: Level,
    pub engine: Engine,
}

impl SummaryRequest {
    pub fn new(source: DocumentSource) -> Self {
        Self {
            source,
            level: Level::default(),
            engine: Engine::default(),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Build a request from raw strings, as received from a form or query.
    ///
    /// Fails with [`SummaryError::InvalidLevel`] or
    /// [`SummaryError::InvalidEngine`] before any I/O happens.
    pub fn parse(source: DocumentSource, level: &str, engine: &str) -> Result<Self, SummaryError> {
        Ok(Self {
            source,
            level: level.parse()?,
            engine: engine.parse()?,
        })
    }
}

/// Summarise a PDF and return the summary with the tables found in it.
///
/// # Errors
/// - [`SummaryError::SourceFetch`] if the document cannot be downloaded or opened
/// - [`SummaryError::ProviderNotConfigured`] if the engine has no credentials
/// - [`SummaryError::Extraction`] if pdfium cannot read the document
/// - [`SummaryError::Provider`] / [`SummaryError::RateLimitExceeded`] from the backend
///
/// # Example
/// ```rust,no_run
/// use edgequake_papersum::{process, DocumentSource, ProviderConfig, SummarizerConfig, SummaryRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SummarizerConfig::builder()
///     .groq(ProviderConfig::groq(std::env::var("GROQ_API_KEY")?))
///     .build()?;
/// let request = SummaryRequest::new(DocumentSource::from_input("paper.pdf"));
/// let result = process(request, &config).await?;
/// println!("{}", result.summary);
/// # Ok(())
/// # }
/// ```
pub async fn process(
    request: SummaryRequest,
    config: &SummarizerConfig,
) -> Result<SummaryResult, SummaryError> {
    let start = Instant::now();
    let SummaryRequest {
        source,
        level,
        engine,
    } = request;
    info!(
        "Summarising {} (level={}, engine={})",
        source.describe(),
        level,
        engine
    );

    // ── Step 1: Resolve source ───────────────────────────────────────────
    notify_stage(config, Stage::Resolving);
    let handle = resolve_source(source, config.download_timeout_secs).await?;

    // ── Step 2: Select backend ───────────────────────────────────────────
    let backend = backend_for(engine, config)?;

    // ── Step 3: Extract; the handle (and any temp file) is dropped here ──
    notify_stage(config, Stage::Extracting);
    let content = extract_content(handle).await?;
    info!(
        "Extracted {} chars and {} tables",
        content.text.chars().count(),
        content.tables.len()
    );

    // ── Step 4: Summarise ────────────────────────────────────────────────
    notify_stage(config, Stage::Summarizing);
    let summary = backend.summarize(&content.text, level).await?;

    if let Some(cb) = &config.progress_callback {
        cb.on_complete(summary.len());
    }
    info!(
        "Summary ready: {} chars in {}ms",
        summary.len(),
        start.elapsed().as_millis()
    );

    Ok(SummaryResult {
        summary,
        tables: content.tables,
    })
}

/// Summarise already-extracted text with the chosen engine.
pub async fn summarize_text(
    text: &str,
    level: Level,
    engine: Engine,
    config: &SummarizerConfig,
) -> Result<String, SummaryError> {
    let backend = backend_for(engine, config)?;
    debug!(
        "Summarising {} chars with {}",
        text.chars().count(),
        backend.name()
    );
    notify_stage(config, Stage::Summarizing);
    let summary = backend.summarize(text, level).await?;
    if let Some(cb) = &config.progress_callback {
        cb.on_complete(summary.len());
    }
    Ok(summary)
}

/// Resolve and extract a document without calling a model.
///
/// Does not require an API key.
pub async fn inspect(
    source: DocumentSource,
    config: &SummarizerConfig,
) -> Result<ExtractedContent, SummaryError> {
    notify_stage(config, Stage::Resolving);
    let handle = resolve_source(source, config.download_timeout_secs).await?;
    notify_stage(config, Stage::Extracting);
    extract_content(handle).await
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_sync(
    request: SummaryRequest,
    config: &SummarizerConfig,
) -> Result<SummaryResult, SummaryError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SummaryError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process(request, config))
}

fn notify_stage(config: &SummarizerConfig, stage: Stage) {
    debug!("Stage: {:?}", stage);
    if let Some(cb) = &config.progress_callback {
        cb.on_stage(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_unknown_level_and_engine() {
        let src = DocumentSource::Bytes(vec![1]);
        assert!(matches!(
            SummaryRequest::parse(src.clone(), "tiny", "groq"),
            Err(SummaryError::InvalidLevel { .. })
        ));
        assert!(matches!(
            SummaryRequest::parse(src.clone(), "short", "gpt5"),
            Err(SummaryError::InvalidEngine { .. })
        ));
        let ok = SummaryRequest::parse(src, "long", "openai").unwrap();
        assert_eq!(ok.level, Level::Long);
        assert_eq!(ok.engine, Engine::OpenAi);
    }

    #[test]
    fn new_request_uses_defaults() {
        let r = SummaryRequest::new(DocumentSource::Url("https://x.org/a.pdf".into()));
        assert_eq!(r.level, Level::Short);
        assert_eq!(r.engine, Engine::Groq);
    }

    #[tokio::test]
    async fn missing_file_fails_before_provider_check() {
        let request = SummaryRequest::new(DocumentSource::File("/no/such/paper.pdf".into()));
        let err = process(request, &SummarizerConfig::default()).await.unwrap_err();
        assert!(matches!(err, SummaryError::SourceFetch { .. }));
    }

    #[tokio::test]
    async fn unconfigured_engine_fails_before_extraction() {
        let request = SummaryRequest::new(DocumentSource::Bytes(b"not a pdf".to_vec()));
        let err = process(request, &SummarizerConfig::default()).await.unwrap_err();
        assert!(matches!(err, SummaryError::ProviderNotConfigured { .. }));
    }
}
