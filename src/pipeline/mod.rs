//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own without a network or a pdfium library.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ (providers) ──▶ SummaryResult
//! (URL/path/bytes)  (pdfium text + tables)
//! ```
//!
//! 1. [`input`]   — turn an upload, path or URL into a readable handle
//! 2. [`extract`] — read page text and find tables; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`tables`]  — geometry-based table detection over positioned text
//! 4. [`chunk`]   — fixed-size splitting for the chunked-summary fallback

pub mod chunk;
pub mod extract;
pub mod input;
pub mod tables;
