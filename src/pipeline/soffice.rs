//! LibreOffice headless adapter: locate `soffice` and export one deck to PDF.
//!
//! ## Why a temp dir?
//!
//! `soffice --convert-to pdf` writes its output next to `--outdir`, and when
//! `--outdir` is omitted, next to the *input* file. Exporting into a private
//! [`tempfile::TempDir`] first and copying the PDF to the real output
//! directory keeps the input tree pristine and means a half-written PDF from
//! a killed export can never appear in the output tree.
//!
//! ## Why a hard timeout?
//!
//! LibreOffice can hang indefinitely on malformed decks. The export runs
//! under [`tokio::time::timeout`] with `kill_on_drop`, so an expired export
//! is killed and reported as a per-file failure rather than stalling a
//! worker forever.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Failure modes of one PDF export.
///
/// All of them are terminal for the file being converted; the pipeline
/// collapses them into a per-file failure record.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("soffice binary not found")]
    NotFound,

    #[error("soffice exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("soffice timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("soffice reported success but produced no PDF")]
    MissingOutput,

    #[error("I/O error during PDF export: {0}")]
    Io(#[from] std::io::Error),
}

/// Locate the `soffice` executable.
///
/// Resolution order, most explicit first:
/// 1. `override_path` from [`crate::BatchConfig::soffice_path`]
/// 2. the `LIBREOFFICE_PATH` environment variable (absolute path or a name
///    searched on `PATH`)
/// 3. the usual binary names on `PATH`, plus the standard Windows install
///    locations
pub fn locate(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = override_path {
        if p.is_file() {
            return Some(p.to_path_buf());
        }
    }

    if let Ok(env_val) = std::env::var("LIBREOFFICE_PATH") {
        if !env_val.is_empty() {
            let p = PathBuf::from(&env_val);
            if p.is_absolute() && p.is_file() {
                return Some(p);
            }
            if let Some(found) = find_in_path(&env_val) {
                return Some(found);
            }
        }
    }

    #[cfg(windows)]
    {
        for fixed in [
            r"C:\Program Files\LibreOffice\program\soffice.exe",
            r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
        ] {
            let p = PathBuf::from(fixed);
            if p.is_file() {
                return Some(p);
            }
        }
        for name in ["soffice.exe", "soffice.com"] {
            if let Some(found) = find_in_path(name) {
                return Some(found);
            }
        }
        None
    }

    #[cfg(not(windows))]
    {
        ["soffice", "libreoffice"]
            .iter()
            .find_map(|name| find_in_path(name))
    }
}

/// Search `PATH` for an executable file named `name`.
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Export one presentation to PDF in `output_dir` using LibreOffice headless.
///
/// The PDF shares the input file's stem. Returns the final PDF path.
pub async fn convert_to_pdf(
    soffice: &Path,
    input: &Path,
    output_dir: &Path,
    timeout_secs: u64,
) -> Result<PathBuf, RenderError> {
    if !input.is_file() {
        return Err(RenderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", input.display()),
        )));
    }

    let scratch = tempfile::Builder::new().prefix("slide2obs_").tempdir()?;

    let mut cmd = Command::new(soffice);
    cmd.arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(scratch.path())
        .arg(input)
        .kill_on_drop(true);

    debug!("Exporting {} via {}", input.display(), soffice.display());

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| RenderError::Timeout { secs: timeout_secs })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::NotFound
            } else {
                RenderError::Io(e)
            }
        })?;

    if !output.status.success() {
        return Err(RenderError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(RenderError::MissingOutput)?;
    let pdf_name = format!("{stem}.pdf");
    let scratch_pdf = scratch.path().join(&pdf_name);
    if !scratch_pdf.is_file() {
        // soffice exits 0 on some unconvertible inputs without writing anything.
        return Err(RenderError::MissingOutput);
    }

    tokio::fs::create_dir_all(output_dir).await?;
    let dest = output_dir.join(&pdf_name);
    tokio::fs::copy(&scratch_pdf, &dest).await?;

    debug!("Exported {}", dest.display());
    Ok(dest)
}
