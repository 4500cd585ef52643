//! The document assembler: front-matter + per-slide embeds → Markdown text.
//!
//! Output shape, per deck:
//!
//! ```text
//! ---
//! title: "Lecture 3"
//! speaker_notes:
//!   - "first non-empty note"
//!   - "next non-empty note"
//! ---
//!
//! ![[Lecture 3.pdf#page=1]]
//!
//! section text for slide 1
//!
//! ![[Lecture 3.pdf#page=2]]
//! ...
//! ```
//!
//! The `speaker_notes` list keeps only non-empty notes and therefore loses
//! the note-to-slide association. That matches the behaviour downstream
//! vaults already depend on; do not "fix" it here.

/// Right-pad with empty strings or truncate so `items.len() == n`.
pub fn pad_or_truncate(mut items: Vec<String>, n: usize) -> Vec<String> {
    items.truncate(n);
    items.resize(n, String::new());
    items
}

/// Assemble the Markdown document for one converted deck.
///
/// * `pdf_basename`: stem shared by the PDF and this document
/// * `slide_count`: N; one embed reference per slide, pages 1..=N
/// * `speaker_notes` / `body_sections`: normalized to length N internally
pub fn build_markdown(
    pdf_basename: &str,
    slide_count: usize,
    speaker_notes: &[String],
    body_sections: &[String],
    title: Option<&str>,
) -> String {
    let pdf_ref = format!("{pdf_basename}.pdf");
    let mut lines: Vec<String> = Vec::new();

    let notes_for_yaml: Vec<&String> = speaker_notes.iter().filter(|n| !n.is_empty()).collect();
    if title.is_some() || !notes_for_yaml.is_empty() {
        lines.push("---".to_string());
        if let Some(t) = title {
            lines.push(format!("title: \"{}\"", escape_yaml(t)));
        }
        if !notes_for_yaml.is_empty() {
            lines.push("speaker_notes:".to_string());
            for note in notes_for_yaml {
                // Notes may span lines; YAML double-quoted scalars here are
                // single-line, so embedded newlines collapse to one space.
                let flat = escape_yaml(note).replace('\n', " ");
                lines.push(format!("  - \"{flat}\""));
            }
        }
        lines.push("---".to_string());
        lines.push(String::new());
    }

    let sections = pad_or_truncate(body_sections.to_vec(), slide_count);
    for (i, section) in sections.iter().enumerate() {
        let page = i + 1;
        lines.push(format!("![[{pdf_ref}#page={page}]]"));
        lines.push(String::new());
        let section = section.trim();
        if !section.is_empty() {
            lines.push(section.to_string());
            lines.push(String::new());
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n").trim().to_string();
    out.push('\n');
    out
}

/// Escape a string for a YAML double-quoted scalar: backslashes first,
/// then double quotes.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
