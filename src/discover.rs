//! Input discovery and output-location mapping.
//!
//! Discovery is deliberately deterministic: the file list is sorted before
//! fan-out so two runs over the same tree submit tasks in the same order
//! (completion order still varies; that is the scheduler's concern, not
//! discovery's).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A supported presentation format, identified by file extension.
///
/// LibreOffice can export all of these to PDF. Only [`InputFormat::Pptx`]
/// is an OOXML zip container, so only it supports slide-count, speaker-note,
/// and semantic-text extraction; the others fall back to PDF page count and
/// empty notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Pptx,
    Ppt,
    Pot,
    Potx,
    Pps,
    Ppsx,
}

impl InputFormat {
    /// All supported extensions, lower-case, without the leading dot.
    pub const EXTENSIONS: [&'static str; 6] = ["pptx", "ppt", "pot", "potx", "pps", "ppsx"];

    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            "pot" => Some(Self::Pot),
            "potx" => Some(Self::Potx),
            "pps" => Some(Self::Pps),
            "ppsx" => Some(Self::Ppsx),
            _ => None,
        }
    }

    /// Whether per-slide structure can be read directly from the file.
    pub fn is_ooxml(self) -> bool {
        // .potx and .ppsx are also OOXML zips with the same internal layout.
        matches!(self, Self::Pptx | Self::Potx | Self::Ppsx)
    }
}

/// Recursively collect every supported presentation file under `root`,
/// sorted for deterministic task submission.
///
/// A single-file `root` yields that one file regardless of extension;
/// single-file validation is the caller's concern.
pub fn find_presentation_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut out = Vec::new();
    walk(root, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if InputFormat::from_path(&path).is_some() {
            out.push(path);
        }
    }
    Ok(())
}

/// Compute the output directory for one input file.
///
/// With mirroring, the file's parent directory relative to `input_root` is
/// re-rooted under `output_base`; a file outside `input_root` lands directly
/// in `output_base`. Without mirroring everything lands flat in
/// `output_base`.
pub fn output_dir_for(
    file: &Path,
    input_root: &Path,
    output_base: &Path,
    mirror: bool,
) -> PathBuf {
    if !mirror {
        return output_base.to_path_buf();
    }
    let parent = file.parent().unwrap_or(file);
    match parent.strip_prefix(input_root) {
        Ok(rel) => output_base.join(rel),
        Err(_) => output_base.to_path_buf(),
    }
}

/// Input pairs whose outputs land on the same `<dir>/<stem>.*` and would
/// overwrite each other, whichever finishes last winning. Mostly bites flat
/// output mode when two subdirectories hold a same-named deck.
///
/// `targets` is `(input file, its output directory)` per file; each reported
/// pair is `(earlier input, colliding input)` in submission order.
pub fn output_collisions(targets: &[(PathBuf, PathBuf)]) -> Vec<(PathBuf, PathBuf)> {
    let mut seen: HashMap<(&Path, &OsStr), &PathBuf> = HashMap::new();
    let mut collisions = Vec::new();
    for (input, out_dir) in targets {
        let Some(stem) = input.file_stem() else { continue };
        match seen.entry((out_dir.as_path(), stem)) {
            Entry::Occupied(first) => collisions.push(((*first.get()).clone(), input.clone())),
            Entry::Vacant(slot) => {
                slot.insert(input);
            }
        }
    }
    collisions
}
