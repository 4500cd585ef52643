//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! real-time events as the scheduler completes each file.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a GUI event loop, or a log
//! sink without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` because files are converted
//! concurrently via `tokio::spawn`.

use crate::output::ConversionResult;
use std::sync::Arc;

/// Called by the batch scheduler as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
///
/// # Ordering
///
/// `on_file_complete` fires in **completion order**, not submission order:
/// file #5 may finish before file #2. `completed` is a monotonically
/// increasing 1-based counter that is safe to drive a progress bar.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any file is converted.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called after each file finishes, whether it succeeded or failed.
    ///
    /// # Arguments
    /// * `completed`: files finished so far (1-based, includes this one)
    /// * `total`: total files in the batch
    /// * `result`: the pass/fail record for this file
    fn on_file_complete(&self, completed: usize, total: usize, result: &ConversionResult) {
        let _ = (completed, total, result);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
