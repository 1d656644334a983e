//! Error types for the img2pdf library.
//!
//! Two error types for two failure modes:
//!
//! * [`IntakeError`]: the user handed us something we will not stage (wrong
//!   media type, an empty drop, a path that cannot be read). Reported with a
//!   toast and otherwise harmless: the staged image is left untouched.
//!
//! * [`Img2PdfError`]: a conversion that started could not finish (unreadable
//!   file, undecodable bitmap, PDF serialisation or save failure). The
//!   orchestrator reports it with an error toast, clears the busy state and
//!   puts the image back so the user can retry.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a candidate file is not staged.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The declared media type is not in the allow-list.
    #[error("Unsupported file type '{media_type}' for '{name}'\nAccepted: image/jpeg, image/png, image/webp")]
    UnsupportedType { name: String, media_type: String },

    /// A drop or picker result carried no files at all.
    #[error("No files were provided")]
    NoFiles,

    /// Building a candidate from a path failed before validation.
    #[error("Cannot read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All conversion failures returned by [`crate::convert::Converter::convert`]
/// and [`crate::convert::convert_image`].
#[derive(Debug, Error)]
pub enum Img2PdfError {
    // ── Read stage ────────────────────────────────────────────────────────
    /// The staged file's content could not be read.
    #[error("Failed to read '{name}': {source}\nThe file may have been moved or deleted since it was selected.")]
    ReadFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A data URL did not have the `data:<type>;base64,<payload>` shape.
    #[error("Malformed data URL: {detail}")]
    InvalidDataUrl { detail: String },

    // ── Decode stage ──────────────────────────────────────────────────────
    /// The bytes are not a decodable image of the declared type.
    #[error("Could not decode '{name}' as {media_type}: {detail}")]
    DecodeFailed {
        name: String,
        media_type: String,
        detail: String,
    },

    /// The image decoded but has a zero dimension, so no page can be laid out.
    #[error("Image has no area ({width}x{height} px)")]
    EmptyImage { width: u32, height: u32 },

    // ── Build / save stage ────────────────────────────────────────────────
    /// lopdf or the JPEG encoder rejected the page.
    #[error("PDF construction failed: {0}")]
    PdfBuildFailed(String),

    /// The document sink could not store the generated PDF.
    #[error("Failed to save '{filename}': {detail}")]
    SaveFailed { filename: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// A blocking task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}
