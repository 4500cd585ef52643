//! The batch scheduler: fan a set of decks across a bounded worker pool.
//!
//! ## Why `buffer_unordered`?
//!
//! Decks vary wildly in conversion time (a 6-slide deck and a 200-slide
//! deck may sit next to each other), so collecting results in submission
//! order would serialise progress reporting behind the slowest file.
//! `futures::stream::buffer_unordered` gives exactly the semantics the
//! batch needs: a bounded number of in-flight conversions and results
//! yielded in completion order.
//!
//! ## Failure isolation
//!
//! [`crate::convert_one`] already converts every per-file error into a
//! result record. Each conversion additionally runs in its own
//! `tokio::spawn`-ed task, so even a panic inside a worker surfaces as a
//! `JoinError` here and becomes one failure entry, never an aborted batch.

use crate::config::BatchConfig;
use crate::convert::convert_one;
use crate::discover::{find_presentation_files, output_collisions, output_dir_for, InputFormat};
use crate::error::Slide2ObsidianError;
use crate::output::{BatchSummary, ConversionResult, FailedFile};
use crate::pipeline::extract::{PptxExtractor, SemanticExtractor};
use crate::pipeline::soffice;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Convert every supported presentation under `input` (or the single file
/// `input`) into PDF + Markdown pairs under `output_base`.
///
/// # Errors
/// Returns `Err` only for batch-level preconditions: missing input path,
/// unsupported single-file input, LibreOffice not installed, or an
/// uncreatable output directory. Per-file failures are collected in the
/// returned [`BatchSummary`] instead.
///
/// # Guarantees
/// * an empty input directory returns `(0, [])` without touching the
///   renderer;
/// * the renderer check runs before any file is processed, so an absent
///   LibreOffice never produces a partial batch;
/// * the progress callback fires once per completed file, in completion
///   order, for successes and failures alike.
pub async fn run_batch(
    input: &Path,
    output_base: &Path,
    config: &BatchConfig,
) -> Result<BatchSummary, Slide2ObsidianError> {
    if !input.exists() {
        return Err(Slide2ObsidianError::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    let input_is_dir = input.is_dir();
    if !input_is_dir && InputFormat::from_path(input).is_none() {
        return Err(Slide2ObsidianError::UnsupportedInput {
            path: input.to_path_buf(),
        });
    }

    let files = find_presentation_files(input)
        .map_err(|e| Slide2ObsidianError::Internal(format!("discovery failed: {e}")))?;
    let total = files.len();
    if total == 0 {
        return Ok(BatchSummary::default());
    }

    // Precondition: no partial batches when the renderer is missing.
    soffice::locate(config.soffice_path.as_deref())
        .ok_or_else(|| Slide2ObsidianError::RendererNotFound { hint: String::new() })?;

    tokio::fs::create_dir_all(output_base)
        .await
        .map_err(|source| Slide2ObsidianError::OutputDir {
            path: output_base.to_path_buf(),
            source,
        })?;

    let workers = config.effective_workers(total);
    let mirror = config.mirror_structure && input_is_dir;
    let targets: Vec<(PathBuf, PathBuf)> = files
        .into_iter()
        .map(|file| {
            let out_dir = output_dir_for(&file, input, output_base, mirror);
            (file, out_dir)
        })
        .collect();
    for (first, second) in output_collisions(&targets) {
        warn!(
            "{} and {} share an output stem; the later finisher overwrites the earlier",
            first.display(),
            second.display()
        );
    }
    let extractor: Arc<dyn SemanticExtractor> = config
        .extractor
        .clone()
        .unwrap_or_else(|| Arc::new(PptxExtractor::new()));

    info!(
        "Converting {total} file(s) with {workers} worker(s) → {}",
        output_base.display()
    );
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results = stream::iter(targets.into_iter().map(|(file, out_dir)| {
        let extractor = Arc::clone(&extractor);
        let config = config.clone();
        async move {
            let task_file = file.clone();
            let handle = tokio::spawn(async move {
                convert_one(&task_file, &out_dir, &extractor, &config).await
            });
            match handle.await {
                Ok(result) => result,
                // A panic inside the task is contained here as one failure.
                Err(e) => ConversionResult::failed(file, format!("conversion task crashed: {e}")),
            }
        }
    }))
    .buffer_unordered(workers);

    let mut summary = BatchSummary {
        total,
        ..Default::default()
    };
    let mut completed = 0usize;
    while let Some(result) = results.next().await {
        completed += 1;
        if result.is_success() {
            summary.success_count += 1;
        } else {
            summary.failed.push(FailedFile {
                path: result.path().to_path_buf(),
                error: result.error().unwrap_or("Unknown error").to_string(),
            });
        }
        if let Some(cb) = &config.progress_callback {
            cb.on_file_complete(completed, total, &result);
        }
    }

    if let Some(cb) = &config.progress_callback {
        cb.on_batch_complete(total, summary.success_count);
    }
    info!(
        "Batch done: {}/{} converted, {} failed",
        summary.success_count,
        total,
        summary.failed.len()
    );
    Ok(summary)
}
