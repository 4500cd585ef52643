//! CLI binary for slide2obsidian.
//!
//! A thin shim over the library crate that maps CLI flags to
//! [`BatchConfig`] and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use slide2obsidian::{
    run_batch, BatchConfig, BatchProgressCallback, ConversionResult, ProgressCallback,
    Slide2ObsidianError,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live progress bar plus one log line per
/// completed file. Files complete out of order in concurrent mode; the bar
/// tracks the completion counter, not file indices.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        self.bar.set_length(total_files as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} presentation(s)…"))
        ));
    }

    fn on_file_complete(&self, completed: usize, total: usize, result: &ConversionResult) {
        let name = result
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| result.path().display().to_string());
        match result.error() {
            None => self.bar.println(format!(
                "  {} {:>3}/{:<3}  {}",
                green("✓"),
                completed,
                total,
                dim(&name),
            )),
            Some(err) => {
                // Long soffice stderr dumps stay readable at one line.
                let msg = match err.char_indices().nth(79) {
                    Some((i, _)) => format!("{}\u{2026}", &err[..i]),
                    None => err.to_string(),
                };
                self.bar.println(format!(
                    "  {} {:>3}/{:<3}  {}  {}",
                    red("✗"),
                    completed,
                    total,
                    name,
                    red(&msg),
                ));
            }
        }
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} file(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} file(s) converted  ({} failed)",
                if failed == total_files { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one deck into ./out/
  slide2obsidian "Lecture 3.pptx"

  # Convert a whole course, mirroring its directory layout into the vault
  slide2obsidian ~/courses/bigdata -o ~/vault/bigdata

  # Everything into one flat directory, 4 workers
  slide2obsidian slides/ -o out/ --no-mirror --jobs 4

  # Machine-readable summary
  slide2obsidian slides/ --json --no-progress > summary.json

OUTPUT LAYOUT:
  For every input deck, two sibling files sharing the deck's stem:
    Lecture 3.pdf   rendered by LibreOffice headless
    Lecture 3.md    YAML front-matter (title, speaker notes) followed by
                    one ![[Lecture 3.pdf#page=N]] embed per slide with the
                    slide's extracted text

SUPPORTED INPUT FORMATS:
  .pptx .ppt .pot .potx .pps .ppsx   (anything LibreOffice can export to PDF;
  speaker notes and per-slide text require the OOXML formats)

ENVIRONMENT VARIABLES:
  LIBREOFFICE_PATH   Path to the soffice binary, when it is not on PATH

EXIT CODES:
  0  every discovered file converted
  1  invalid input, LibreOffice missing, or at least one file failed
"#;

/// Convert PowerPoint presentations to Obsidian-ready Markdown + PDF pairs.
#[derive(Parser, Debug)]
#[command(
    name = "slide2obsidian",
    version,
    about = "Convert PowerPoint presentations to Obsidian-ready Markdown + PDF pairs",
    long_about = "Batch-convert presentations (.pptx, .ppt, .pot, .potx, .pps, .ppsx) into \
paired artifacts for an Obsidian vault: a PDF rendered by LibreOffice headless and a Markdown \
document with speaker-note front-matter and per-slide PDF page embeds.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input presentation file or directory to scan recursively.
    input: PathBuf,

    /// Output directory (created if missing).
    #[arg(short, long, env = "SLIDE2OBSIDIAN_OUTPUT", default_value = "out")]
    output: PathBuf,

    /// Put all outputs in one directory instead of mirroring the input tree.
    #[arg(long, env = "SLIDE2OBSIDIAN_NO_MIRROR")]
    no_mirror: bool,

    /// Number of parallel conversions (default: CPU count - 1).
    #[arg(short, long, env = "SLIDE2OBSIDIAN_JOBS")]
    jobs: Option<usize>,

    /// Seconds to wait for one LibreOffice export before failing the file.
    #[arg(long, env = "SLIDE2OBSIDIAN_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Explicit path to the soffice binary.
    #[arg(long, env = "LIBREOFFICE_PATH")]
    soffice: Option<PathBuf>,

    /// Print the batch summary as JSON instead of text.
    #[arg(long, env = "SLIDE2OBSIDIAN_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "SLIDE2OBSIDIAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SLIDE2OBSIDIAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SLIDE2OBSIDIAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar is the user-facing feedback channel; keep library
    // logs quiet while it is active unless the user asked for them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = BatchConfig::builder()
        .mirror_structure(!cli.no_mirror)
        .renderer_timeout_secs(cli.timeout);
    if let Some(jobs) = cli.jobs {
        builder = builder.workers(jobs);
    }
    if let Some(soffice) = &cli.soffice {
        builder = builder.soffice_path(soffice);
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let summary = match run_batch(&cli.input, &cli.output, &config).await {
        Ok(summary) => summary,
        Err(e @ Slide2ObsidianError::RendererNotFound { .. }) => {
            // The precondition error is the whole story; no backtrace noise.
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Batch conversion failed"),
    };

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        println!(
            "\nDone: {} converted, {} failed.",
            summary.success_count,
            summary.failed.len()
        );
    }
    if !summary.failed.is_empty() {
        if !cli.json {
            for f in &summary.failed {
                eprintln!("  FAILED: {}\n    {}", f.path.display(), f.error);
            }
        }
        std::process::exit(1);
    }
    Ok(())
}
