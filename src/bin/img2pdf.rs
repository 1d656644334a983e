//! CLI binary for img2pdf.
//!
//! A terminal front end over the library: the image given on the command
//! line goes through the same intake and conversion workflow as a browser
//! drop would, with toasts printed to stderr and the PDF written to a
//! directory.

use anyhow::{Context, Result};
use clap::Parser;
use img2pdf::{
    App, CandidateFile, Celebration, ConfettiBurst, ConvertOutcome, ConverterConfig,
    DirectorySink, PreviewView, Severity, Surfaces, ToastMessage, ToastSurface, TriggerView,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn paint(code: &str, s: &str) -> String {
    format!("\x1b[{code}m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    paint("2", s)
}
fn bold(s: &str) -> String {
    paint("1", s)
}

/// Closest terminal colour to each severity's toast colour.
fn severity_code(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "34",
        Severity::Success => "36",
        Severity::Warning => "33",
        Severity::Error => "31",
    }
}

// ── Terminal surfaces ────────────────────────────────────────────────────────

/// Renders every UI surface on stderr. Lines printed while the spinner is
/// active go through the bar so they don't tear it.
struct Console {
    quiet: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl Console {
    fn new(quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            quiet,
            spinner: Mutex::new(None),
        })
    }

    fn line(&self, text: String) {
        let spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match spinner.as_ref() {
            Some(bar) => bar.println(text),
            None => eprintln!("{text}"),
        }
    }
}

impl ToastSurface for Console {
    fn show(&self, toast: &ToastMessage) {
        if self.quiet && toast.severity != Severity::Error {
            return;
        }
        self.line(paint(severity_code(toast.severity), &toast.text));
    }
}

impl PreviewView for Console {
    fn set_file_name(&self, name: &str) {
        if !self.quiet {
            self.line(format!("  {} {}", dim("file:"), name));
        }
    }

    fn set_file_size(&self, size: &str) {
        if !self.quiet {
            self.line(format!("  {} {}", dim("size:"), size));
        }
    }

    fn set_preview_visible(&self, _visible: bool) {}
}

impl TriggerView for Console {
    fn set_busy(&self, busy: bool) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if busy {
            if self.quiet {
                return;
            }
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Converting");
            bar.set_message("building PDF…");
            bar.enable_steady_tick(Duration::from_millis(80));
            *spinner = Some(bar);
        } else if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }
}

impl Celebration for Console {
    fn celebrate(&self, burst: &ConfettiBurst) {
        if self.quiet {
            return;
        }
        let pieces: String = burst
            .colors
            .iter()
            .enumerate()
            .map(|(i, _)| paint(["34", "35", "31", "36"][i % 4], "✦"))
            .collect::<Vec<_>>()
            .join(" ");
        self.line(format!("  {pieces}"));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert into the current directory
  img2pdf photo.jpg

  # Write into another directory, no start-up delay
  img2pdf scan.png -o out/ --delay-ms 0

  # US Letter width instead of A4
  img2pdf receipt.webp --page-width 612

  # JSON report for scripting
  img2pdf --json -q photo.jpg

The output file is named after the input up to its first dot:
  holiday.photo.jpg → holiday.pdf
"#;

/// Convert a JPG, PNG or WebP image into a single-page PDF.
#[derive(Parser, Debug)]
#[command(
    name = "img2pdf",
    version,
    about = "Convert a JPG, PNG or WebP image into a single-page PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image file to convert.
    input: PathBuf,

    /// Directory the PDF is written to.
    #[arg(short, long, env = "IMG2PDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Page width in PDF points (A4 = 595.28, Letter = 612).
    #[arg(long, env = "IMG2PDF_PAGE_WIDTH", default_value_t = img2pdf::A4_WIDTH_PT)]
    page_width: f32,

    /// Delay before the conversion starts, in milliseconds.
    #[arg(long, env = "IMG2PDF_DELAY_MS", default_value_t = 800)]
    delay_ms: u64,

    /// JPEG quality of the embedded image (1–100).
    #[arg(long, env = "IMG2PDF_QUALITY", default_value_t = 92,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Skip the celebration after a successful save.
    #[arg(long, env = "IMG2PDF_NO_CELEBRATE")]
    no_celebrate: bool,

    /// Print the conversion report as JSON on stdout.
    #[arg(long, env = "IMG2PDF_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Toasts already tell the story; library INFO logs only with -v.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = ConverterConfig::builder()
        .page_width_pt(cli.page_width)
        .startup_delay_ms(cli.delay_ms)
        .jpeg_quality(cli.quality)
        .celebrate(!cli.no_celebrate)
        .build()
        .context("Invalid configuration")?;

    let console = Console::new(cli.quiet);
    let surfaces = Surfaces {
        toast: console.clone(),
        preview: console.clone(),
        trigger: console.clone(),
        celebration: console,
        ..Surfaces::default()
    };
    let sink = Arc::new(DirectorySink::new(&cli.output_dir));
    let app = App::new(config, surfaces, sink);

    // ── Intake ───────────────────────────────────────────────────────────
    let candidate = CandidateFile::from_path(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    app.intake()
        .select_file(candidate)
        .context("Image rejected")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let outcome = app.converter().convert().await.context("Conversion failed")?;

    match outcome {
        ConvertOutcome::Saved(report) => {
            if cli.json {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialise report")?;
                println!("{json}");
            } else if !cli.quiet {
                let target = cli.output_dir.join(&report.output_name);
                eprintln!(
                    "{}×{} px  →  {:.2}×{:.2} pt  {}  {}",
                    report.image_width,
                    report.image_height,
                    report.page_width_pt,
                    report.page_height_pt,
                    dim(&format!("{}ms", report.duration_ms)),
                    bold(&target.display().to_string()),
                );
            }
            Ok(())
        }
        ConvertOutcome::NothingSelected => anyhow::bail!("No image was staged"),
        ConvertOutcome::AlreadyRunning => anyhow::bail!("A conversion is already running"),
    }
}
