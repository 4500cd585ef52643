//! Error types for the slide2obsidian library.
//!
//! Two distinct failure modes get two distinct representations:
//!
//! * [`Slide2ObsidianError`] is **fatal / batch-level**: the batch cannot
//!   proceed at all (input path missing, LibreOffice not installed, output
//!   directory not writable). Returned as `Err` from [`crate::run_batch`].
//!
//! * Per-file failures are **values, not errors**: one corrupt deck produces
//!   a [`crate::output::ConversionResult`] with `success = false` and an
//!   error string, and every other deck in the batch keeps converting. The
//!   pipeline in [`crate::convert`] is the boundary that turns every
//!   per-file error path into such a record; nothing above it ever sees a
//!   `Result::Err` for a single file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the slide2obsidian library.
///
/// Per-file failures are reported via
/// [`crate::output::ConversionResult`] instead of propagated here.
#[derive(Debug, Error)]
pub enum Slide2ObsidianError {
    /// Input file or directory was not found at the given path.
    #[error("Input path not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Input is a single file but its extension is not a supported
    /// presentation format.
    #[error(
        "Input file is not a supported presentation format: '{path}'\n\
         Supported extensions: .pptx, .ppt, .pot, .potx, .pps, .ppsx"
    )]
    UnsupportedInput { path: PathBuf },

    /// LibreOffice could not be located. Checked before any file is
    /// processed so a missing renderer never produces partial batches.
    #[error(
        "LibreOffice was not found. slide2obsidian requires LibreOffice for PDF export.\n\
         - Install LibreOffice: https://www.libreoffice.org/download\n\
         - Or set LIBREOFFICE_PATH to the path of soffice (e.g. soffice.exe on Windows).{hint}"
    )]
    RendererNotFound { hint: String },

    /// Could not create the base output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
