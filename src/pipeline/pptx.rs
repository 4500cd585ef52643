//! Structured OOXML reader: slide count, speaker notes, and per-slide text.
//!
//! A `.pptx` (and `.potx`/`.ppsx`) file is a zip container of XML parts.
//! This module reads exactly three kinds of parts:
//!
//! * `ppt/slides/slideN.xml`: slide count and visible text
//! * `ppt/notesSlides/notesSlideN.xml`: speaker notes (the `body`
//!   placeholder; the slide-number placeholder is deliberately skipped)
//!
//! The public entry points never fail past their boundary: any zip or XML
//! problem degrades to `0` / empty collections, matching the contract that a
//! structured-read failure must never kill a file whose PDF export worked.

use roxmltree::Node;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NOTES_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

/// Errors internal to the OOXML reader; callers outside this module only
/// ever see the degraded defaults.
#[derive(Debug, thiserror::Error)]
pub enum PptxError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Visible text of one slide, in slide order.
#[derive(Debug, Clone, Default)]
pub struct SlideText {
    /// Text of the title placeholder, if the slide has one.
    pub title: Option<String>,
    /// Remaining shape text, one entry per non-title shape with text.
    pub body: Vec<String>,
    /// Alt-text of pictures and other graphic frames on the slide.
    pub alt: Vec<String>,
}

/// Number of slides in the deck, or 0 for unsupported/corrupt files.
pub async fn slide_count(path: &Path) -> usize {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || match Archive::open(&path) {
        Ok(archive) => archive.slide_paths.len(),
        Err(e) => {
            debug!("Not a readable OOXML deck {}: {e}", path.display());
            0
        }
    })
    .await
    .unwrap_or(0)
}

/// Speaker notes, one string per slide in order; empty string for slides
/// without notes, empty vec for unsupported/corrupt files.
pub async fn speaker_notes(path: &Path) -> Vec<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || match speaker_notes_blocking(&path) {
        Ok(notes) => notes,
        Err(e) => {
            debug!("No speaker notes from {}: {e}", path.display());
            Vec::new()
        }
    })
    .await
    .unwrap_or_default()
}

fn speaker_notes_blocking(path: &Path) -> Result<Vec<String>, PptxError> {
    let mut archive = Archive::open(path)?;
    let slides: Vec<(u32, String)> = archive
        .slide_paths
        .iter()
        .map(|(n, p)| (*n, p.clone()))
        .collect();
    let mut notes = Vec::with_capacity(slides.len());
    for (n, slide_path) in slides {
        // The notes page belongs to the slide via its relationships part.
        // Decks written without one (or with no notesSlide relationship)
        // fall back to the parallel-numbering convention, which holds for
        // straight-through exports but can drift after slide deletion or
        // reordering.
        let part = match archive.read_part(&rels_path_for(&slide_path)) {
            Ok(xml) => notes_part_from_rels(&xml)?,
            Err(PptxError::Zip(zip::result::ZipError::FileNotFound)) => None,
            Err(e) => return Err(e),
        }
        .unwrap_or_else(|| format!("ppt/notesSlides/notesSlide{n}.xml"));
        let text = match archive.read_part(&part) {
            Ok(xml) => notes_body_text(&xml)?,
            // Slides without notes have no notesSlide part at all.
            Err(PptxError::Zip(zip::result::ZipError::FileNotFound)) => String::new(),
            Err(e) => return Err(e),
        };
        notes.push(text);
    }
    Ok(notes)
}

/// Relationships part path for a slide part:
/// `ppt/slides/slide1.xml` maps to `ppt/slides/_rels/slide1.xml.rels`.
fn rels_path_for(slide_path: &str) -> String {
    match slide_path.rfind('/') {
        Some(pos) => format!(
            "{}_rels/{}.rels",
            &slide_path[..pos + 1],
            &slide_path[pos + 1..]
        ),
        None => format!("_rels/{slide_path}.rels"),
    }
}

/// The notes part a slide's relationships point at, if any.
fn notes_part_from_rels(xml: &str) -> Result<Option<String>, PptxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let target = doc
        .descendants()
        .filter(|n| n.has_tag_name("Relationship"))
        .find(|n| n.attribute("Type") == Some(NOTES_REL_TYPE))
        .and_then(|n| n.attribute("Target"))
        .map(|t| resolve_part_path("ppt/slides", t));
    Ok(target)
}

/// Resolve a relationship `Target` (relative to `base_dir`, or
/// package-absolute with a leading `/`) to a zip part name.
fn resolve_part_path(base_dir: &str, target: &str) -> String {
    if let Some(abs) = target.strip_prefix('/') {
        return abs.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Per-slide visible text, for the built-in semantic extractor.
///
/// Unlike [`slide_count`]/[`speaker_notes`] this propagates errors: the
/// extractor wants to distinguish "unsupported file" from "deck with no
/// text" so it can report the former explicitly.
pub fn slide_texts(path: &Path) -> Result<Vec<SlideText>, PptxError> {
    let mut archive = Archive::open(path)?;
    let parts: Vec<String> = archive.slide_paths.values().cloned().collect();
    let mut slides = Vec::with_capacity(parts.len());
    for part in parts {
        let xml = archive.read_part(&part)?;
        slides.push(slide_text_from_xml(&xml)?);
    }
    Ok(slides)
}

// ── Container access ─────────────────────────────────────────────────────

/// An opened deck: the zip archive plus its slide parts keyed by slide
/// number. A `BTreeMap` keeps slides in numeric order (lexicographic sorting
/// would put `slide10` before `slide2`).
struct Archive {
    zip: zip::ZipArchive<std::fs::File>,
    slide_paths: BTreeMap<u32, String>,
}

impl Archive {
    fn open(path: &Path) -> Result<Self, PptxError> {
        let file = std::fs::File::open(path)?;
        let zip = zip::ZipArchive::new(file)?;

        let mut slide_paths = BTreeMap::new();
        for name in zip.file_names() {
            if let Some(n) = part_number(name, "ppt/slides/slide") {
                slide_paths.insert(n, name.to_string());
            }
        }
        Ok(Self { zip, slide_paths })
    }

    fn read_part(&mut self, name: &str) -> Result<String, PptxError> {
        let mut part = self.zip.by_name(name)?;
        let mut xml = String::with_capacity(part.size() as usize);
        part.read_to_string(&mut xml)?;
        Ok(xml)
    }
}

/// Parse the slide number out of `ppt/slides/slide42.xml`-style part names.
fn part_number(name: &str, prefix: &str) -> Option<u32> {
    name.strip_prefix(prefix)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

// ── XML harvesting ───────────────────────────────────────────────────────

/// Text of the notes `body` placeholder. Notes pages also carry a slide
/// thumbnail and a slide-number placeholder; harvesting every `a:t` would
/// pollute the notes with a stray page number.
fn notes_body_text(xml: &str) -> Result<String, PptxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let text = doc
        .descendants()
        .filter(|n| n.has_tag_name((P_NS, "sp")))
        .find(|sp| placeholder_type(*sp) == Some("body"))
        .map(|sp| paragraphs_text(sp))
        .unwrap_or_default();
    Ok(text)
}

fn slide_text_from_xml(xml: &str) -> Result<SlideText, PptxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut slide = SlideText::default();

    for sp in doc.descendants().filter(|n| n.has_tag_name((P_NS, "sp"))) {
        let text = paragraphs_text(sp);
        if text.is_empty() {
            continue;
        }
        match placeholder_type(sp) {
            Some("title") | Some("ctrTitle") if slide.title.is_none() => {
                slide.title = Some(text);
            }
            _ => slide.body.push(text),
        }
    }

    // Alt-text lives on the non-visual properties of pictures/frames.
    for cnvpr in doc.descendants().filter(|n| n.has_tag_name((P_NS, "cNvPr"))) {
        if let Some(descr) = cnvpr.attribute("descr") {
            let descr = descr.trim();
            if !descr.is_empty() {
                slide.alt.push(descr.to_string());
            }
        }
    }

    Ok(slide)
}

/// The `type` attribute of a shape's placeholder element, if any.
fn placeholder_type<'a: 'input, 'input>(sp: Node<'a, 'input>) -> Option<&'input str> {
    sp.descendants()
        .find(|n| n.has_tag_name((P_NS, "ph")))
        .and_then(|ph| ph.attribute("type"))
}

/// All paragraph text under `scope`, paragraphs joined with newlines,
/// trimmed. Runs within a paragraph are concatenated without separators,
/// matching how they render.
fn paragraphs_text(scope: Node<'_, '_>) -> String {
    let paras: Vec<String> = scope
        .descendants()
        .filter(|n| n.has_tag_name((A_NS, "p")))
        .map(|p| {
            p.descendants()
                .filter(|n| n.has_tag_name((A_NS, "t")))
                .filter_map(|t| t.text())
                .collect()
        })
        .collect();
    paras.join("\n").trim().to_string()
}

// ── Test fixture support ─────────────────────────────────────────────────

/// Write a minimal but well-formed pptx zip for tests.
#[cfg(test)]
fn write_fixture_deck(
    path: &Path,
    slides: &[(&str, &str)],
    notes: &[Option<&str>],
) -> std::io::Result<()> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let opts = SimpleFileOptions::default();

    for (i, (title, body)) in slides.iter().enumerate() {
        let n = i + 1;
        zip.start_file(format!("ppt/slides/slide{n}.xml"), opts)?;
        write!(
            zip,
            r#"<p:sld xmlns:p="{P_NS}" xmlns:a="{A_NS}"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
  <p:txBody><a:p><a:r><a:t>{title}</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="body"/></p:nvPr></p:nvSpPr>
  <p:txBody><a:p><a:r><a:t>{body}</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld></p:sld>"#
        )?;
        if let Some(Some(note)) = notes.get(i) {
            zip.start_file(format!("ppt/notesSlides/notesSlide{n}.xml"), opts)?;
            write!(
                zip,
                r#"<p:notes xmlns:p="{P_NS}" xmlns:a="{A_NS}"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="sldNum"/></p:nvPr></p:nvSpPr>
  <p:txBody><a:p><a:r><a:t>{n}</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="body"/></p:nvPr></p:nvSpPr>
  <p:txBody><a:p><a:r><a:t>{note}</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld></p:notes>"#
            )?;
        }
    }
    zip.finish()?;
    Ok(())
}
