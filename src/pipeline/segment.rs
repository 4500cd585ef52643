//! The segmenter: align one unstructured Markdown blob to exactly N slides.
//!
//! The semantic blob has no slide boundaries, only heading markers that
//! *usually* correspond one-to-one with slides. The algorithm is a
//! line-oriented scan that groups lines into candidate parts at heading
//! starts, then dispatches on the shape of the result:
//!
//! * **Leading intro**: the blob opens with body text before any heading
//!   and there are at most N parts: the intro belongs to slide 1 and each
//!   heading-led part follows in order.
//! * **Heading-led**: every part opens with a heading (or there are more
//!   parts than slides): the first N parts map to the N slides, excess
//!   trailing parts are discarded, missing ones pad with empty strings.
//!
//! When the part count equals N both shapes describe a valid assignment;
//! the leading-intro shape takes priority. Each emitted chunk drops its
//! leading heading marker, since the PDF-page embed already heads the
//! section in the assembled document. The postcondition is absolute: the
//! output length
//! is exactly `slide_count`, every entry trimmed.

/// How the candidate parts line up against the slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitShape {
    /// Body text precedes the first heading and parts fit within the slides.
    LeadingIntro,
    /// Every part is heading-led, or there are more parts than slides.
    HeadingLed,
}

/// Split `blob` into exactly `slide_count` ordered chunks.
///
/// Pure and deterministic: same `(blob, slide_count)` in, same chunks out.
/// `slide_count == 0` yields an empty vec; an empty or whitespace-only blob
/// yields `slide_count` empty strings.
pub fn split_by_slides(blob: &str, slide_count: usize) -> Vec<String> {
    if slide_count == 0 {
        return Vec::new();
    }
    let stripped = blob.trim();
    if stripped.is_empty() {
        return vec![String::new(); slide_count];
    }

    let parts = candidate_parts(stripped);

    let shape = if !parts.is_empty()
        && !is_heading_line(first_line(&parts[0]))
        && parts.len() <= slide_count
    {
        SplitShape::LeadingIntro
    } else {
        SplitShape::HeadingLed
    };

    let taken = match shape {
        SplitShape::LeadingIntro => parts.as_slice(),
        SplitShape::HeadingLed => &parts[..parts.len().min(slide_count)],
    };

    let mut out: Vec<String> = taken.iter().map(|p| clean_part(p)).collect();
    out.resize(slide_count, String::new());
    out
}

/// Group the blob's lines into candidate parts: a new part begins at every
/// heading line except when the heading is the very first line (then it
/// merely starts part 1). Line terminators are preserved inside parts so
/// multi-line sections survive intact.
fn candidate_parts(stripped: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for line in stripped.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        let bare = bare.strip_suffix('\r').unwrap_or(bare);
        if is_heading_line(bare) && !parts.is_empty() {
            parts.push(line.to_string());
        } else {
            match parts.last_mut() {
                Some(cur) => cur.push_str(line),
                None => parts.push(line.to_string()),
            }
        }
    }
    parts
}

/// A heading start: 1–6 `#` followed by a whitespace character, or by
/// nothing at all (the line terminator counts as the required whitespace,
/// so a bare `#` line is a boundary).
fn is_heading_line(line: &str) -> bool {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return false;
    }
    match line.as_bytes().get(hashes) {
        None => true,
        Some(b) => b.is_ascii_whitespace(),
    }
}

/// Trim a part, dropping its leading heading marker when present.
fn clean_part(part: &str) -> String {
    let part = part.trim();
    if is_heading_line(first_line(part)) {
        let hashes = part.bytes().take_while(|&b| b == b'#').count();
        part[hashes..].trim().to_string()
    } else {
        part.to_string()
    }
}

fn first_line(part: &str) -> &str {
    part.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_slides_yields_empty_sequence() {
        assert!(split_by_slides("# A\nbody", 0).is_empty());
    }

    #[test]
    fn empty_blob_yields_n_empty_strings() {
        for n in 1..=5 {
            let out = split_by_slides("", n);
            assert_eq!(out.len(), n);
            assert!(out.iter().all(String::is_empty));
        }
        assert_eq!(split_by_slides("  \n\t\n", 3), vec!["", "", ""]);
    }

    #[test]
    fn output_length_always_matches_slide_count() {
        let blobs = [
            "",
            "just text",
            "# A",
            "# A\nx\n# B\ny",
            "intro\n# A\nx\n# B\ny\n# C\nz",
        ];
        for blob in blobs {
            for n in 1..=6 {
                assert_eq!(split_by_slides(blob, n).len(), n, "blob={blob:?} n={n}");
            }
        }
    }

    #[test]
    fn segmentation_is_idempotent() {
        let blob = "Intro\n# One\nalpha\n# Two\nbeta";
        assert_eq!(split_by_slides(blob, 4), split_by_slides(blob, 4));
    }

    #[test]
    fn leading_intro_goes_to_slide_one() {
        // Intro text, then two headed sections, three slides.
        let blob = "Intro text\n# Slide One\nbody1\n# Slide Two\nbody2";
        let out = split_by_slides(blob, 3);
        assert_eq!(out, vec!["Intro text", "Slide One\nbody1", "Slide Two\nbody2"]);
    }

    #[test]
    fn excess_heading_parts_are_discarded() {
        let blob = "# A\nx\n# B\ny\n# C\nz\n# D\nw";
        let out = split_by_slides(blob, 2);
        assert_eq!(out, vec!["A\nx", "B\ny"]);
    }

    #[test]
    fn too_few_heading_parts_pad_with_empty() {
        let blob = "# A\nx\n# B\ny";
        let out = split_by_slides(blob, 4);
        assert_eq!(out, vec!["A\nx", "B\ny", "", ""]);
    }

    #[test]
    fn intro_shape_takes_priority_at_equal_counts() {
        // Three parts, three slides, first part not a heading: the intro
        // shape must win (slide 1 gets the intro, not the first heading).
        let blob = "intro\n# A\nx\n# B\ny";
        let out = split_by_slides(blob, 3);
        assert_eq!(out[0], "intro");
        assert_eq!(out[1], "A\nx");
    }

    #[test]
    fn intro_with_more_parts_than_slides_switches_to_heading_led() {
        // Intro + 3 headings against 2 slides: parts > N, heading-led rules
        // apply and the first two parts win.
        let blob = "intro\n# A\nx\n# B\ny\n# C\nz";
        let out = split_by_slides(blob, 2);
        assert_eq!(out, vec!["intro", "A\nx"]);
    }

    #[test]
    fn single_slide_takes_whole_blob_when_unheaded() {
        let out = split_by_slides("no headings anywhere\nsecond line", 1);
        assert_eq!(out, vec!["no headings anywhere\nsecond line"]);
    }

    #[test]
    fn heading_levels_up_to_six_split_seven_does_not() {
        let out = split_by_slides("###### deep\nx\n####### not-a-heading\ny", 2);
        assert_eq!(out[0], "deep\nx\n####### not-a-heading\ny");
        assert_eq!(out[1], "");
    }

    #[test]
    fn hash_without_following_whitespace_is_not_a_heading() {
        let out = split_by_slides("text\n#hashtag more text", 2);
        assert_eq!(out, vec!["text\n#hashtag more text", ""]);
    }

    #[test]
    fn bare_hash_line_is_a_boundary() {
        let out = split_by_slides("text\n#\nafter", 2);
        assert_eq!(out, vec!["text", "after"]);
    }

    #[test]
    fn blank_line_before_heading_does_not_leak_whitespace() {
        let out = split_by_slides("Intro\n\n# A\nbody", 2);
        assert_eq!(out, vec!["Intro", "A\nbody"]);
    }

    #[test]
    fn crlf_input_still_splits() {
        let out = split_by_slides("# A\r\nx\r\n# B\r\ny", 2);
        assert_eq!(out, vec!["A\r\nx", "B\r\ny"]);
    }
}
