//! Semantic extraction: the whole-deck Markdown blob.
//!
//! The extraction engine is an explicit dependency injected into every
//! conversion task, not process-global state: the scheduler constructs one
//! instance up front (or takes a caller-supplied one from
//! [`crate::BatchConfig::extractor`]) and passes it by `Arc` into each task.
//! Implementations are `Send + Sync` and reused across files, so anything
//! expensive to initialise is amortised over the whole batch.
//!
//! The built-in [`PptxExtractor`] reads the slide XML directly and emits one
//! `#`-heading per slide title followed by the slide's text, the shape that
//! the segmenter's heading heuristics are tuned for. It only understands
//! OOXML containers; legacy binary formats return
//! [`ExtractError::Unsupported`], which the pipeline downgrades to an empty
//! blob rather than a failure.

use crate::discover::InputFormat;
use crate::pipeline::pptx;
use std::path::Path;

/// One unsupported-or-failed extraction; the pipeline never fails a file
/// over it, but a richer engine behind this trait may care to distinguish.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The engine does not understand this format at all.
    #[error("extraction does not support '{extension}' files")]
    Unsupported { extension: String },

    /// The file is the right format but could not be parsed.
    #[error("extraction failed: {0}")]
    Failed(String),
}

/// A format-aware engine turning one input file into one unstructured
/// Markdown blob, with no awareness of slide boundaries.
///
/// Contract notes:
/// * must be safe for sequential reuse across many files;
/// * must be `Send + Sync`; the scheduler shares one instance across
///   concurrently running tasks;
/// * an `Err` means "no blob", never "abort the file".
pub trait SemanticExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// The built-in extractor for OOXML decks.
///
/// Produces, per slide: `# <title>` (when the slide has a title
/// placeholder), the body text of each shape, and `alt` text of images in
/// emphasis, separated by blank lines.
#[derive(Debug, Default)]
pub struct PptxExtractor;

impl PptxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl SemanticExtractor for PptxExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let ooxml = InputFormat::from_path(path).is_some_and(InputFormat::is_ooxml);
        if !ooxml {
            return Err(ExtractError::Unsupported {
                extension: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("?")
                    .to_ascii_lowercase(),
            });
        }

        let slides = pptx::slide_texts(path).map_err(|e| ExtractError::Failed(e.to_string()))?;

        let mut sections = Vec::with_capacity(slides.len());
        for slide in &slides {
            let mut parts = Vec::new();
            if let Some(title) = &slide.title {
                // Titles can span lines in the XML; a heading must not.
                parts.push(format!("# {}", title.replace('\n', " ")));
            }
            for body in &slide.body {
                parts.push(body.clone());
            }
            for alt in &slide.alt {
                parts.push(format!("*{alt}*"));
            }
            if !parts.is_empty() {
                sections.push(parts.join("\n\n"));
            }
        }
        Ok(sections.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_formats_are_unsupported() {
        let err = PptxExtractor::new()
            .extract(Path::new("/tmp/old.ppt"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported { .. }));
        assert!(err.to_string().contains("ppt"));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = PptxExtractor::new()
            .extract(Path::new("/tmp/file.docx"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported { .. }));
    }

    #[test]
    fn corrupt_pptx_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("deck.pptx");
        std::fs::write(&p, b"not a zip").unwrap();
        let err = PptxExtractor::new().extract(&p).unwrap_err();
        assert!(matches!(err, ExtractError::Failed(_)));
    }

    /// A stub engine for scheduler tests: always yields a fixed blob.
    struct FixedExtractor(&'static str);

    impl SemanticExtractor for FixedExtractor {
        fn extract(&self, _path: &Path) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn trait_objects_are_shareable() {
        use std::sync::Arc;
        let ex: Arc<dyn SemanticExtractor> = Arc::new(FixedExtractor("# A\nbody"));
        let clone = Arc::clone(&ex);
        assert_eq!(clone.extract(Path::new("x.pptx")).unwrap(), "# A\nbody");
    }
}
