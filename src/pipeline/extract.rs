//! Content extraction: read page text and detect tables via pdfium.
//!
//! pdfium is a C++ library behind `pdfium-render`; calls are blocking and
//! CPU-bound, so extraction runs inside `spawn_blocking`. The handle is moved
//! into the blocking task and dropped there, which removes a downloaded temp
//! file as soon as extraction finishes or fails.
//!
//! The pdfium shared library is looked up in this order: `PDFIUM_LIB_PATH`,
//! the current directory, then the system library search path.

use crate::error::SummaryError;
use crate::output::{ExtractedContent, Table};
use crate::pipeline::input::DocumentHandle;
use crate::pipeline::tables::{TableDetector, TextFragment};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Extract text and tables from a resolved document.
pub async fn extract_content(handle: DocumentHandle) -> Result<ExtractedContent, SummaryError> {
    tokio::task::spawn_blocking(move || {
        let result = extract_blocking(&handle);
        drop(handle);
        result
    })
    .await
    .map_err(|e| SummaryError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Whether a pdfium library can be bound in this process.
pub fn pdfium_available() -> bool {
    bind_pdfium().is_ok()
}

/// Bind to the pdfium shared library.
fn bind_pdfium() -> Result<Pdfium, SummaryError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(PathBuf::from(path)),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| SummaryError::Extraction {
        detail: format!(
            "failed to bind to pdfium library: {:?}\n\
             Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide.",
            e
        ),
    })?;

    Ok(Pdfium::new(bindings))
}

/// Blocking implementation of content extraction.
fn extract_blocking(handle: &DocumentHandle) -> Result<ExtractedContent, SummaryError> {
    let pdfium = bind_pdfium()?;

    let document = match handle {
        DocumentHandle::Memory(bytes) => pdfium.load_pdf_from_byte_slice(bytes, None),
        DocumentHandle::Local(path) | DocumentHandle::Downloaded { path, .. } => {
            pdfium.load_pdf_from_file(path, None)
        }
    }
    .map_err(|e| SummaryError::Extraction {
        detail: format!("{:?}", e),
    })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let detector = TableDetector::new();
    let mut page_texts: Vec<String> = Vec::with_capacity(pages.len() as usize);
    let mut tables: Vec<Table> = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        let text = match page.text() {
            Ok(text) => text,
            Err(e) => {
                warn!("Page {}: no extractable text ({:?})", idx + 1, e);
                page_texts.push(String::new());
                continue;
            }
        };

        page_texts.push(text.all());

        let fragments: Vec<TextFragment> = text
            .segments()
            .iter()
            .map(|segment| {
                let bounds = segment.bounds();
                TextFragment::new(
                    segment.text(),
                    bounds.left().value,
                    bounds.bottom().value,
                    bounds.width().value,
                    bounds.height().value,
                )
            })
            .collect();

        let page_tables = detector.detect(&fragments);
        debug!(
            "Page {}: {} segments, {} tables",
            idx + 1,
            fragments.len(),
            page_tables.len()
        );
        tables.extend(page_tables);
    }

    Ok(ExtractedContent {
        text: join_page_texts(&page_texts),
        tables,
    })
}

/// Join per-page texts with newlines and trim the result.
pub(crate) fn join_page_texts(pages: &[String]) -> String {
    pages.join("\n").trim().to_string()
}
