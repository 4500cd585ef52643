//! Result records produced by the conversion pipeline and batch scheduler.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The outcome of converting one presentation file.
///
/// Produced exactly once per input file by [`crate::convert::convert_one`]
/// and aggregated by [`crate::batch::run_batch`]. The invariant
/// `success ⇔ error.is_none()` is enforced by the two constructors;
/// the fields are read-only outside this module for that reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    success: bool,
    path: PathBuf,
    error: Option<String>,
}

impl ConversionResult {
    /// A successful conversion of `path`.
    pub fn ok(path: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            path: path.into(),
            error: None,
        }
    }

    /// A failed conversion of `path` with a human-readable reason.
    pub fn failed(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: path.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The original input file this record describes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The failure reason; `None` exactly when the conversion succeeded.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// One failed file inside a [`BatchSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregate outcome of a batch run.
///
/// `failed` is in completion order, which is non-deterministic across runs
/// when files are converted in parallel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of files discovered and attempted.
    pub total: usize,
    /// Files that produced both output artifacts.
    pub success_count: usize,
    /// Files that failed, with their error messages.
    pub failed: Vec<FailedFile>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
