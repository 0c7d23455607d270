//! # edgequake-papersum
//!
//! Summarise academic PDFs with a chat-completion model and pull out the
//! tables they contain.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF (upload / path / URL)
//!  │
//!  ├─ 1. Input    resolve to a local handle, downloading URLs to a temp dir
//!  ├─ 2. Extract  page text + table detection via pdfium (spawn_blocking)
//!  ├─ 3. Prompt   level instruction + document text
//!  ├─ 4. Backend  groq (chunked fallback) or openai (rate-limit backoff)
//!  └─ 5. Output   summary + tables
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_papersum::{
//!     process, DocumentSource, Engine, Level, ProviderConfig, SummarizerConfig, SummaryRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummarizerConfig::builder()
//!         .openai(ProviderConfig::openai(std::env::var("OPENAI_API_KEY")?))
//!         .build()?;
//!     let request = SummaryRequest::new(DocumentSource::from_input("https://arxiv.org/pdf/1706.03762"))
//!         .with_level(Level::Medium)
//!         .with_engine(Engine::OpenAi);
//!     let result = process(request, &config).await?;
//!     println!("{}", result.summary);
//!     eprintln!("{} tables", result.tables.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `papersum` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-papersum = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! Extraction needs the pdfium shared library at runtime. Point
//! `PDFIUM_LIB_PATH` at it, place it in the working directory, or install it
//! system-wide.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod providers;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Engine, Level, ProviderConfig, SummarizerConfig, SummarizerConfigBuilder};
pub use error::{ErrorKind, SummaryError};
pub use output::{ExtractedContent, Row, SummaryResult, Table};
pub use pipeline::extract::pdfium_available;
pub use pipeline::input::{DocumentHandle, DocumentSource};
pub use progress::{NoopProgressCallback, ProgressCallback, Stage, SummaryProgressCallback};
pub use providers::{
    backend_for, ChatMessage, ChatRequest, ChatTransport, CompletionOutcome, GroqBackend,
    HttpChatTransport, OpenAiBackend, SummaryBackend,
};
pub use summarize::{inspect, process, process_sync, summarize_text, SummaryRequest};
