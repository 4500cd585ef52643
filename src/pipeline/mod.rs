//! Pipeline stages for presentation-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different renderer or extraction engine) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! soffice ──▶ pdf ──▶ pptx ──▶ extract ──▶ segment ──▶ markdown
//! (render)  (stamp,  (count,   (semantic   (N chunks)  (assemble)
//!            pages)   notes)    blob)
//! ```
//!
//! 1. [`soffice`]: invoke LibreOffice headless to export a PDF; the only
//!    stage that spawns an external process
//! 2. [`pdf`]: stamp title/provenance metadata and read the page count
//!    via `lopdf`; runs in `spawn_blocking` because parsing is CPU-bound
//! 3. [`pptx`]: read slide count and speaker notes from the OOXML
//!    container (`zip` + `roxmltree`); never fails past its boundary
//! 4. [`extract`]: produce the whole-deck semantic Markdown blob; failures
//!    degrade to an empty blob
//! 5. [`segment`]: align the blob to exactly N slides
//! 6. [`markdown`]: assemble front-matter + per-slide embeds

pub mod extract;
pub mod markdown;
pub mod pdf;
pub mod pptx;
pub mod segment;
pub mod soffice;
