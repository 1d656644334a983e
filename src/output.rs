//! Conversion results.

use crate::intake::MediaType;
use crate::pipeline::layout::PageLayout;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finished single-page document, ready to be saved.
#[derive(Clone)]
pub struct GeneratedPdf {
    /// Suggested file name, e.g. `photo.pdf`.
    pub filename: String,
    pub page: PageLayout,
    /// Pixel size of the embedded image.
    pub image_width: u32,
    pub image_height: u32,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for GeneratedPdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedPdf")
            .field("filename", &self.filename)
            .field("page", &self.page)
            .field("image_width", &self.image_width)
            .field("image_height", &self.image_height)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Summary of a successful conversion, suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub source_name: String,
    pub output_name: String,
    pub media_type: MediaType,
    pub image_width: u32,
    pub image_height: u32,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// Size of the generated PDF.
    pub pdf_bytes: usize,
    /// Pipeline wall-clock time, including the startup delay.
    pub duration_ms: u64,
}
