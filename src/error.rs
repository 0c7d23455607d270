//! Error types for the edgequake-papersum library.
//!
//! Every failure in the pipeline is fatal for the request: there is no
//! partial [`crate::output::SummaryResult`]. The one recoverable condition,
//! an oversized or rate-limited whole-text call on the Groq backend, is
//! handled inside [`crate::providers::GroqBackend`] and never surfaces here.
//!
//! Callers translating errors into a transport response (HTTP status, exit
//! code) should switch on [`SummaryError::kind`] rather than on individual
//! variants.

use thiserror::Error;

/// Coarse error category for collaborators such as an HTTP route layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller supplied something unusable (unknown level, both file and URL, …).
    BadInput,
    /// The input was fine but the pipeline failed while processing it.
    ProcessingFailure,
}

/// All fatal errors returned by the edgequake-papersum library.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Unrecognised summary level string.
    #[error("Invalid summary level '{value}': expected one of short, medium, long")]
    InvalidLevel { value: String },

    /// Unrecognised engine string.
    #[error("Invalid engine '{value}': expected one of groq, openai")]
    InvalidEngine { value: String },

    /// The collaborator supplied neither or both of an upload and a URL.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ── Source errors ─────────────────────────────────────────────────────
    /// The document could not be downloaded or read from disk.
    #[error("Failed to fetch '{location}': {reason}")]
    SourceFetch { location: String, reason: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open or parse the document.
    #[error("PDF extraction failed: {detail}")]
    Extraction { detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No credentials/endpoint were configured for the selected engine.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The provider call failed for a reason other than a recoverable
    /// rate limit or oversized payload.
    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// Every retry attempt was rate limited.
    #[error("Rate limit exceeded for provider '{provider}' after {attempts} attempts")]
    RateLimitExceeded { provider: String, attempts: u32 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task panic, runtime creation, …).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummaryError {
    /// Classify the error as bad input or processing failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummaryError::InvalidLevel { .. }
            | SummaryError::InvalidEngine { .. }
            | SummaryError::InvalidInput { .. } => ErrorKind::BadInput,
            _ => ErrorKind::ProcessingFailure,
        }
    }
}
