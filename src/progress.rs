//! Progress-callback trait for pipeline events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummarizerConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves through its stages, summarises fallback
//! chunks, or backs off after a rate limit.
//!
//! # Example
//!
//! ```rust
//! use edgequake_papersum::{Stage, SummarizerConfig, SummaryProgressCallback};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl SummaryProgressCallback for Printer {
//!     fn on_stage(&self, stage: Stage) {
//!         eprintln!("stage: {stage:?}");
//!     }
//! }
//!
//! let config = SummarizerConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn SummaryProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;
use std::time::Duration;

/// Pipeline stage, reported in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Downloading or opening the document.
    Resolving,
    /// Reading text and tables out of the PDF.
    Extracting,
    /// Waiting on the language model.
    Summarizing,
}

/// Called by the pipeline as it processes a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called when the pipeline enters `stage`.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called after each fallback chunk is summarised.
    ///
    /// # Arguments
    /// * `index` — 1-indexed chunk number
    /// * `total` — number of chunks
    fn on_chunk_complete(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called before sleeping ahead of a retry.
    ///
    /// # Arguments
    /// * `attempt`      — the attempt that was rate limited (1-indexed)
    /// * `max_attempts` — the attempt budget
    /// * `delay`        — how long the backend will sleep
    fn on_retry(&self, attempt: u32, max_attempts: u32, delay: Duration) {
        let _ = (attempt, max_attempts, delay);
    }

    /// Called once the summary is ready.
    fn on_complete(&self, summary_len: usize) {
        let _ = summary_len;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummarizerConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        stages: Mutex<Vec<Stage>>,
        retries: Mutex<Vec<Duration>>,
    }

    impl SummaryProgressCallback for Recorder {
        fn on_stage(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_retry(&self, _attempt: u32, _max_attempts: u32, delay: Duration) {
            self.retries.lock().unwrap().push(delay);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage(Stage::Resolving);
        cb.on_chunk_complete(1, 3);
        cb.on_retry(1, 5, Duration::from_secs(5));
        cb.on_complete(42);
    }

    #[test]
    fn recorder_receives_events_through_arc_dyn() {
        let recorder = Arc::new(Recorder::default());
        let cb: ProgressCallback = recorder.clone();
        cb.on_stage(Stage::Extracting);
        cb.on_stage(Stage::Summarizing);
        cb.on_retry(1, 5, Duration::from_secs(5));
        cb.on_chunk_complete(2, 4);

        assert_eq!(
            *recorder.stages.lock().unwrap(),
            vec![Stage::Extracting, Stage::Summarizing]
        );
        assert_eq!(*recorder.retries.lock().unwrap(), vec![Duration::from_secs(5)]);
    }
}
