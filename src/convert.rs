//! The per-file conversion pipeline.
//!
//! [`convert_one`] is the failure boundary for everything that can go wrong
//! with a single deck: it never returns an error, only a
//! [`ConversionResult`]. Terminal failures (rendering, unresolvable slide
//! count) stop the file; recoverable ones (metadata stamping, speaker-note
//! reads, semantic extraction) degrade to safe defaults so the file still
//! produces its artifact pair.

use crate::config::BatchConfig;
use crate::output::ConversionResult;
use crate::pipeline::extract::SemanticExtractor;
use crate::pipeline::markdown::{build_markdown, pad_or_truncate};
use crate::pipeline::segment::split_by_slides;
use crate::pipeline::{pdf, pptx, soffice};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Failures that stop one file's pipeline. Collapsed into the error string
/// of a failed [`ConversionResult`] at the boundary.
#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error("PDF conversion failed (LibreOffice): {0}")]
    Render(#[from] soffice::RenderError),

    #[error("No slides found or invalid file")]
    NoSlides,

    #[error("Failed to write Markdown: {0}")]
    WriteMarkdown(#[from] std::io::Error),

    #[error("Input file has no usable name: {0}")]
    BadStem(String),
}

/// Convert one presentation into a PDF + Markdown pair in `output_dir`.
///
/// Never fails past this boundary: every error path becomes a
/// `ConversionResult` with `success = false`. On a failure after step 1 the
/// exported PDF may already exist in `output_dir`; that partial artifact is
/// left in place deliberately (it is valid on its own and the next run
/// overwrites it).
pub async fn convert_one(
    input: &Path,
    output_dir: &Path,
    extractor: &Arc<dyn SemanticExtractor>,
    config: &BatchConfig,
) -> ConversionResult {
    match convert_one_inner(input, output_dir, extractor, config).await {
        Ok(()) => ConversionResult::ok(input),
        Err(e) => ConversionResult::failed(input, e.to_string()),
    }
}

async fn convert_one_inner(
    input: &Path,
    output_dir: &Path,
    extractor: &Arc<dyn SemanticExtractor>,
    config: &BatchConfig,
) -> Result<(), StepError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| StepError::BadStem(input.display().to_string()))?;

    // ── Step 1: PDF via LibreOffice (works for all supported formats) ────
    let soffice_bin =
        soffice::locate(config.soffice_path.as_deref()).ok_or(soffice::RenderError::NotFound)?;
    let pdf_path = soffice::convert_to_pdf(
        &soffice_bin,
        input,
        output_dir,
        config.renderer_timeout_secs,
    )
    .await?;

    // ── Step 2: stamp metadata (cosmetic; failures are swallowed) ────────
    if let Err(e) = pdf::stamp_metadata(&pdf_path, &stem, &input.display().to_string()).await {
        warn!("Could not stamp metadata on {}: {e}", pdf_path.display());
    }

    // ── Step 3: slide count, falling back to the PDF page count ──────────
    let mut slide_count = pptx::slide_count(input).await;
    if slide_count == 0 {
        slide_count = pdf::page_count(&pdf_path).await;
    }
    if slide_count == 0 {
        return Err(StepError::NoSlides);
    }

    // ── Step 4: speaker notes, normalized to N ───────────────────────────
    let notes = pad_or_truncate(pptx::speaker_notes(input).await, slide_count);

    // ── Step 5: semantic blob (any failure degrades to empty) ────────────
    let blob = {
        let extractor = Arc::clone(extractor);
        let path = input.to_path_buf();
        tokio::task::spawn_blocking(move || match extractor.extract(&path) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                debug!("No semantic text from {}: {e}", path.display());
                String::new()
            }
        })
        .await
        .unwrap_or_default()
    };

    // ── Step 6: align the blob to the slides ─────────────────────────────
    let sections = split_by_slides(&blob, slide_count);

    // ── Step 7: assemble and write the Markdown sibling ──────────────────
    let md = build_markdown(&stem, slide_count, &notes, &sections, Some(&stem));
    let md_path = output_dir.join(format!("{stem}.md"));
    tokio::fs::write(&md_path, md).await?;

    info!(
        "Converted {} ({} slides) → {}",
        input.display(),
        slide_count,
        md_path.display()
    );
    Ok(())
}
