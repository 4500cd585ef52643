//! PDF inspection and stamping via `lopdf`.
//!
//! Two small jobs on the LibreOffice-produced PDF: read the page count
//! (the fallback slide-count source for non-OOXML inputs) and stamp the
//! Info dictionary with a title and the source deck's path so the PDF
//! stays traceable to the presentation it came from.
//!
//! Both run in `spawn_blocking`: `lopdf` parses the whole cross-reference
//! table synchronously and a large deck's PDF can take noticeable CPU time.

use lopdf::{Document, Object};
use std::path::Path;
use tracing::debug;

/// Producer prefix written into stamped PDFs.
const PRODUCER_TAG: &str = "slide2obsidian";

/// Number of pages in the PDF, or 0 if it cannot be opened or parsed.
///
/// The 0-on-failure contract lets the pipeline treat "unreadable PDF" and
/// "empty PDF" identically: both mean the slide count must come from
/// somewhere else or the file fails.
pub async fn page_count(pdf_path: &Path) -> usize {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || match Document::load(&path) {
        Ok(doc) => doc.get_pages().len(),
        Err(e) => {
            debug!("Could not read page count from {}: {e}", path.display());
            0
        }
    })
    .await
    .unwrap_or(0)
}

/// Stamp the PDF's Info dictionary with `title` and the source deck path.
///
/// Saves via temp-file-then-rename so a crash mid-save never corrupts the
/// already-exported PDF. Errors are returned for the caller to log; the
/// pipeline treats stamping as cosmetic and never fails a file over it.
pub async fn stamp_metadata(
    pdf_path: &Path,
    title: &str,
    source: &str,
) -> Result<(), StampError> {
    let path = pdf_path.to_path_buf();
    let title = title.to_string();
    let source = source.to_string();

    tokio::task::spawn_blocking(move || stamp_blocking(&path, &title, &source))
        .await
        .map_err(|e| StampError::Task(e.to_string()))?
}

/// Stamping failure; always non-fatal to the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum StampError {
    #[error("PDF parse/save failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error while stamping: {0}")]
    Io(#[from] std::io::Error),

    #[error("stamping task panicked: {0}")]
    Task(String),
}

fn stamp_blocking(path: &Path, title: &str, source: &str) -> Result<(), StampError> {
    let mut doc = Document::load(path)?;

    let mut info = lopdf::Dictionary::new();
    info.set("Title", Object::string_literal(title));
    info.set(
        "Producer",
        Object::string_literal(format!("{PRODUCER_TAG}; source={source}")),
    );
    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));

    let tmp = path.with_extension("pdf.tmp");
    doc.save(&tmp)?;
    std::fs::rename(&tmp, path)?;
    debug!("Stamped metadata on {}", path.display());
    Ok(())
}
