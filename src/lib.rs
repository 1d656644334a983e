//! # img2pdf
//!
//! Turn a single JPG, PNG or WebP image into a one-page PDF whose page is as
//! wide as the configured page width (A4 by default) and exactly as tall as
//! the image's aspect ratio requires.
//!
//! The crate models the whole interactive converter, not just the pipeline:
//! a drop zone and file picker feed a validating intake, a toast notifier
//! reports every step, and an orchestrator runs the conversion with a busy
//! guard and hands the finished document to a sink. Front ends plug in their
//! own rendering through small traits ([`ToastSurface`], [`PreviewView`],
//! [`DropZoneView`], [`TriggerView`], [`Celebration`], [`DocumentSink`]).
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Intake  declared type check, preview, staging slot
//!  ├─ 2. Read    bytes → base64 data URL
//!  ├─ 3. Decode  data URL → bitmap (CPU-bound, spawn_blocking)
//!  ├─ 4. Layout  page width W, height = W × h / w
//!  ├─ 5. PDF     JPEG-embedded image on one page (lopdf)
//!  └─ 6. Save    <name before first dot>.pdf via a DocumentSink
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2pdf::{App, CandidateFile, ConverterConfig, DirectorySink, Surfaces};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = Arc::new(DirectorySink::new("out"));
//!     let app = App::new(ConverterConfig::default(), Surfaces::default(), sink);
//!
//!     app.intake().select_file(CandidateFile::from_path("photo.png")?)?;
//!     let outcome = app.converter().convert().await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `img2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | on      | Enables [`server`] and the `img2pdf-server` binary (axum + tower-http) |
//!
//! Disable both when using only the library:
//! ```toml
//! img2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod app;
pub mod celebrate;
pub mod config;
pub mod convert;
pub mod dropzone;
pub mod error;
pub mod intake;
pub mod output;
pub mod pipeline;
pub mod sink;
pub mod state;
pub mod toast;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use app::{App, Surfaces};
pub use celebrate::{Celebration, ConfettiBurst, NoCelebration};
pub use config::{ConverterConfig, ConverterConfigBuilder, ServerConfig, A4_WIDTH_PT};
pub use convert::{convert_image, ConvertOutcome, Converter, NoopTriggerView, TriggerView};
pub use dropzone::{DragEvent, DragResponse, DragTarget, DropZone, DropZoneView, NoopDropZoneView};
pub use error::{Img2PdfError, IntakeError};
pub use intake::{
    format_size, CandidateFile, FileContent, FileIntake, MediaType, NoopPreviewView, PreviewView,
    SelectedImage,
};
pub use output::{ConversionReport, GeneratedPdf};
pub use sink::{DirectorySink, DocumentSink};
pub use state::{AppState, SharedState};
pub use toast::{NoopToastSurface, Severity, ToastMessage, ToastNotifier, ToastSurface};
