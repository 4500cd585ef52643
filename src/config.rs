//! Configuration for batch conversion.
//!
//! All behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config across the worker tasks and to log how two runs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::Slide2ObsidianError;
use crate::pipeline::extract::SemanticExtractor;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a batch conversion run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use slide2obsidian::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .mirror_structure(false)
///     .workers(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Mirror the input directory's relative structure in the output tree.
    /// Default: true. Ignored when the input is a single file.
    pub mirror_structure: bool,

    /// Number of parallel conversion workers. Default: `None` (auto).
    ///
    /// Auto sizing is `max(1, available_parallelism - 1)`, leaving one core
    /// free so the host machine stays responsive during a long batch. The
    /// pool is additionally capped at the file count; spawning more workers
    /// than tasks buys nothing.
    pub workers: Option<usize>,

    /// Seconds to wait for one LibreOffice export before treating it as a
    /// failure. Default: 120.
    ///
    /// LibreOffice occasionally hangs on malformed decks; without a bound a
    /// single bad file would stall its worker forever. Expired exports are
    /// killed and reported as per-file failures, never retried.
    pub renderer_timeout_secs: u64,

    /// Explicit path to the `soffice` binary.
    ///
    /// If `None`, the `LIBREOFFICE_PATH` environment variable is consulted
    /// first, then `PATH` is searched for the usual binary names.
    pub soffice_path: Option<PathBuf>,

    /// Per-file progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,

    /// Pre-built semantic extractor shared by all workers.
    ///
    /// If `None`, one [`crate::PptxExtractor`] is constructed at batch start
    /// and passed into every conversion task. Inject a custom implementation
    /// to plug in a richer extraction engine (or a stub in tests).
    pub extractor: Option<Arc<dyn SemanticExtractor>>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mirror_structure: true,
            workers: None,
            renderer_timeout_secs: 120,
            soffice_path: None,
            progress_callback: None,
            extractor: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("mirror_structure", &self.mirror_structure)
            .field("workers", &self.workers)
            .field("renderer_timeout_secs", &self.renderer_timeout_secs)
            .field("soffice_path", &self.soffice_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn SemanticExtractor>"))
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Effective worker count for a batch of `file_count` files.
    ///
    /// Never more than `file_count`, never less than 1 when there is work.
    pub fn effective_workers(&self, file_count: usize) -> usize {
        let auto = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2)
            .saturating_sub(1)
            .max(1);
        self.workers.unwrap_or(auto).max(1).min(file_count.max(1))
    }
}

/// Builder for [`BatchConfig`].
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn mirror_structure(mut self, v: bool) -> Self {
        self.config.mirror_structure = v;
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.config.workers = Some(n.max(1));
        self
    }

    pub fn renderer_timeout_secs(mut self, secs: u64) -> Self {
        self.config.renderer_timeout_secs = secs;
        self
    }

    pub fn soffice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.soffice_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn SemanticExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, Slide2ObsidianError> {
        let c = &self.config;
        if c.renderer_timeout_secs == 0 {
            return Err(Slide2ObsidianError::InvalidConfig(
                "renderer timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
