//! # slide2obsidian
//!
//! Batch-convert PowerPoint presentations into Obsidian-ready
//! **Markdown + PDF pairs**.
//!
//! ## Why this crate?
//!
//! Slide decks are terrible notes: the visual layout lives in the deck, the
//! actual words live in speaker notes, and neither is searchable from a
//! note-taking vault. This crate converts each presentation into two sibling
//! files sharing a stem: a PDF rendered by LibreOffice headless, and a
//! Markdown document whose per-slide sections embed the matching PDF page
//! (`![[Lecture.pdf#page=3]]`) and carry the speaker notes in YAML
//! front-matter.
//!
//! ## Pipeline Overview
//!
//! ```text
//! deck.pptx
//!  │
//!  ├─ 1. Render    LibreOffice headless → deck.pdf (temp dir, then copy)
//!  ├─ 2. Stamp     PDF title + source provenance (best-effort)
//!  ├─ 3. Count     slide count from the pptx, falling back to PDF pages
//!  ├─ 4. Notes     speaker notes per slide, padded/truncated to N
//!  ├─ 5. Extract   whole-deck Markdown blob (semantic extractor)
//!  ├─ 6. Segment   blob → exactly N per-slide sections
//!  └─ 7. Assemble  front-matter + per-slide embeds → deck.md
//! ```
//!
//! Many decks are converted in parallel with per-file failure isolation:
//! one corrupt deck produces one failure record, never a crashed batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slide2obsidian::{run_batch, BatchConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::default();
//!     let summary = run_batch(
//!         Path::new("lectures/"),
//!         Path::new("vault/lectures/"),
//!         &config,
//!     )
//!     .await?;
//!     println!("{} converted, {} failed", summary.success_count, summary.failed.len());
//!     for f in &summary.failed {
//!         eprintln!("  FAILED: {}: {}", f.path.display(), f.error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Requirements
//!
//! LibreOffice must be installed for PDF export. The `soffice` binary is
//! located on `PATH`, or explicitly via the `LIBREOFFICE_PATH` environment
//! variable.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `slide2obsidian` binary (clap + anyhow + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod discover;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::run_batch;
pub use config::{BatchConfig, BatchConfigBuilder};
pub use convert::convert_one;
pub use discover::{output_dir_for, InputFormat};
pub use error::Slide2ObsidianError;
pub use output::{BatchSummary, ConversionResult, FailedFile};
pub use pipeline::extract::{ExtractError, PptxExtractor, SemanticExtractor};
pub use pipeline::markdown::build_markdown;
pub use pipeline::segment::split_by_slides;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
