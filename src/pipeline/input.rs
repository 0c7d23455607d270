//! Source resolution: normalise an upload, a local path or a URL into a
//! [`DocumentHandle`] the extractor can open.
//!
//! Downloads land in a `TempDir` owned by the handle, so the file is removed
//! when the handle is dropped, whichever way the request ends. Uploaded bytes
//! are moved into the handle without copying. Nothing here checks that the
//! bytes are a PDF; a bad document fails at extraction.

use crate::error::SummaryError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// What a caller hands to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// An `http://` or `https://` URL to download.
    Url(String),
    /// A PDF already on disk. Never deleted by the pipeline.
    File(PathBuf),
    /// An uploaded PDF held in memory.
    Bytes(Vec<u8>),
}

impl DocumentSource {
    /// Interpret a CLI-style input string: URLs become [`DocumentSource::Url`],
    /// anything else is treated as a local path.
    pub fn from_input(input: &str) -> Self {
        if is_url(input) {
            DocumentSource::Url(input.to_string())
        } else {
            DocumentSource::File(PathBuf::from(input))
        }
    }

    /// Validate upload-or-URL input from a form or route.
    ///
    /// Exactly one of `file` and `url` must be present and non-empty.
    pub fn from_parts(file: Option<Vec<u8>>, url: Option<String>) -> Result<Self, SummaryError> {
        let file = file.filter(|f| !f.is_empty());
        let url = url.filter(|u| !u.trim().is_empty());

        match (file, url) {
            (Some(_), Some(_)) => Err(SummaryError::InvalidInput {
                reason: "provide either a file or a URL, not both".into(),
            }),
            (None, None) => Err(SummaryError::InvalidInput {
                reason: "provide either a file or a URL".into(),
            }),
            (Some(bytes), None) => Ok(DocumentSource::Bytes(bytes)),
            (None, Some(url)) => Ok(DocumentSource::Url(url.trim().to_string())),
        }
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Url(url) => url.clone(),
            DocumentSource::File(path) => path.display().to_string(),
            DocumentSource::Bytes(bytes) => format!("<{} uploaded bytes>", bytes.len()),
        }
    }
}

/// A locally readable document, owned by exactly one request.
pub enum DocumentHandle {
    /// A caller-owned file on disk.
    Local(PathBuf),
    /// A downloaded file. The `TempDir` is kept alive until the handle drops.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
    /// Uploaded bytes.
    Memory(Vec<u8>),
}

impl DocumentHandle {
    /// Path on disk, if the handle is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DocumentHandle::Local(p) => Some(p),
            DocumentHandle::Downloaded { path, .. } => Some(path),
            DocumentHandle::Memory(_) => None,
        }
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentHandle::Local(p) => f.debug_tuple("Local").field(p).finish(),
            DocumentHandle::Downloaded { path, .. } => {
                f.debug_struct("Downloaded").field("path", path).finish()
            }
            DocumentHandle::Memory(bytes) => write!(f, "Memory(<{} bytes>)", bytes.len()),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a source into a handle, downloading URLs to a temp directory.
pub async fn resolve_source(
    source: DocumentSource,
    timeout_secs: u64,
) -> Result<DocumentHandle, SummaryError> {
    match source {
        DocumentSource::Url(url) if is_url(&url) => download_url(&url, timeout_secs).await,
        DocumentSource::Url(other) => Err(SummaryError::SourceFetch {
            location: other,
            reason: "not an http(s) URL".into(),
        }),
        DocumentSource::File(path) => resolve_local(path),
        DocumentSource::Bytes(bytes) => {
            debug!("Using {} uploaded bytes", bytes.len());
            Ok(DocumentHandle::Memory(bytes))
        }
    }
}

/// Check that a local file exists and can be opened.
fn resolve_local(path: PathBuf) -> Result<DocumentHandle, SummaryError> {
    if let Err(e) = std::fs::File::open(&path) {
        return Err(SummaryError::SourceFetch {
            location: path.display().to_string(),
            reason: e.to_string(),
        });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(DocumentHandle::Local(path))
}

/// Download a URL into a fresh temporary directory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<DocumentHandle, SummaryError> {
    info!("Downloading PDF from: {}", url);

    let fetch_error = |reason: String| SummaryError::SourceFetch {
        location: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            fetch_error(format!("timed out after {timeout_secs}s"))
        } else {
            fetch_error(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let temp_dir = TempDir::new().map_err(|e| fetch_error(format!("temp dir: {e}")))?;
    let file_path = temp_dir.path().join(filename_from_url(url));

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| fetch_error(format!("failed to write temp file: {e}")))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(DocumentHandle::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Pick a filename from the last URL path segment, falling back to a fixed name.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded_paper.pdf".to_string()
}
