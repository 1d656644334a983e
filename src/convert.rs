//! Conversion orchestration: staged image → saved PDF.
//!
//! [`convert_image`] runs the pipeline stages with no UI side effects.
//! [`Converter::convert`] wraps it in the interactive workflow: precondition
//! checks, busy state, toasts, the save hand-off and the celebration. Every
//! failure in the asynchronous chain ends at one error boundary, which
//! reports it, clears the busy state and puts the image back.

use crate::celebrate::{Celebration, ConfettiBurst};
use crate::config::ConverterConfig;
use crate::error::Img2PdfError;
use crate::intake::{FileIntake, SelectedImage};
use crate::output::{ConversionReport, GeneratedPdf};
use crate::pipeline::layout::{output_filename, PageLayout};
use crate::pipeline::{decode, pdf, read};
use crate::sink::DocumentSink;
use crate::state::SharedState;
use crate::toast::ToastNotifier;
use image::GenericImageView;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The control that starts a conversion.
pub trait TriggerView: Send + Sync {
    /// Show (and disable) or clear the loading state.
    fn set_busy(&self, busy: bool);
}

/// A trigger that renders nothing.
pub struct NoopTriggerView;

impl TriggerView for NoopTriggerView {
    fn set_busy(&self, _busy: bool) {}
}

/// How a call to [`Converter::convert`] ended, short of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertOutcome {
    /// The document was built and handed to the sink.
    Saved(ConversionReport),
    /// Nothing was staged; a warning toast was shown.
    NothingSelected,
    /// Another conversion is in flight; the call did nothing.
    AlreadyRunning,
}

/// Convert a staged image into a single-page PDF.
///
/// Stages run strictly in sequence: read into a data URL, decode the bitmap,
/// lay out the page, build the document.
///
/// # Errors
/// Returns `Err(Img2PdfError)` when the content cannot be read, is not a
/// decodable image, has a zero dimension, or the PDF cannot be serialised.
pub async fn convert_image(
    image: &SelectedImage,
    config: &ConverterConfig,
) -> Result<GeneratedPdf, Img2PdfError> {
    // ── Step 1: Read into a data URL ─────────────────────────────────────
    let url = read::read_as_data_url(image).await?;

    // ── Step 2: Decode the bitmap ────────────────────────────────────────
    let bitmap = decode::decode_data_url(url, &image.name).await?;
    let (image_width, image_height) = bitmap.dimensions();

    // ── Step 3: Page geometry ────────────────────────────────────────────
    let page = PageLayout::scale_to_width(image_width, image_height, config.page_width_pt)?;
    debug!(
        "Page for {}: {:.2} x {:.2} pt",
        image.name, page.width_pt, page.height_pt
    );

    // ── Step 4: Build the document ───────────────────────────────────────
    let bytes = pdf::build_pdf(bitmap, page, &image.name, config.jpeg_quality).await?;

    Ok(GeneratedPdf {
        filename: output_filename(&image.name),
        page,
        image_width,
        image_height,
        bytes,
    })
}

/// The interactive conversion workflow.
#[derive(Clone)]
pub struct Converter {
    config: ConverterConfig,
    state: SharedState,
    intake: FileIntake,
    notifier: ToastNotifier,
    trigger: Arc<dyn TriggerView>,
    sink: Arc<dyn DocumentSink>,
    celebration: Arc<dyn Celebration>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("sink", &"<dyn DocumentSink>")
            .finish()
    }
}

impl Converter {
    pub fn new(
        config: ConverterConfig,
        intake: FileIntake,
        notifier: ToastNotifier,
        trigger: Arc<dyn TriggerView>,
        sink: Arc<dyn DocumentSink>,
        celebration: Arc<dyn Celebration>,
    ) -> Self {
        Self {
            config,
            state: intake.state().clone(),
            intake,
            notifier,
            trigger,
            sink,
            celebration,
        }
    }

    /// Convert the staged image and hand the PDF to the sink.
    ///
    /// * Already running → returns [`ConvertOutcome::AlreadyRunning`], no effects.
    /// * Nothing staged → one warning toast, [`ConvertOutcome::NothingSelected`].
    /// * Otherwise the image leaves the staging slot and the pipeline runs.
    ///   On success the preview is reset, a success toast is shown and the
    ///   celebration fires. On failure an error toast is shown, the image is
    ///   restored to the slot (unless another one was staged meanwhile) and
    ///   the error is returned.
    ///
    /// The busy state is cleared on every path that set it.
    pub async fn convert(&self) -> Result<ConvertOutcome, Img2PdfError> {
        let staged = {
            let mut state = self.state.lock();
            if state.busy {
                debug!("Conversion already in flight; ignoring trigger");
                return Ok(ConvertOutcome::AlreadyRunning);
            }
            let staged = state.selected.take();
            state.busy = staged.is_some();
            staged
        };

        let Some(image) = staged else {
            self.notifier.warning("⚠️ Please select an image first!");
            return Ok(ConvertOutcome::NothingSelected);
        };

        let guard = InFlight {
            converter: self,
            image: Some(image.clone()),
        };
        self.trigger.set_busy(true);
        info!("Starting conversion: {}", image.name);
        let result = self.run(&image).await;
        guard.disarm();

        let slot_was_empty = self.settle(&image, result.is_err());

        match result {
            Ok(report) => {
                if slot_was_empty {
                    self.intake.reset_preview();
                }
                info!(
                    "Conversion complete: {} → {} ({} bytes, {}ms)",
                    report.source_name, report.output_name, report.pdf_bytes, report.duration_ms
                );
                self.notifier.success("✅ PDF created successfully!");
                if self.config.celebrate {
                    self.celebration.celebrate(&ConfettiBurst::default());
                }
                Ok(ConvertOutcome::Saved(report))
            }
            Err(e) => {
                warn!("Conversion of {} failed: {}", image.name, e);
                let summary = e.to_string();
                let summary = summary.lines().next().unwrap_or_default();
                self.notifier
                    .error(format!("❌ Could not convert {}: {}", image.name, summary));
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Leave the busy state. With `restore`, `image` goes back into the slot
    /// unless another one was staged meanwhile. Returns whether the slot was
    /// empty.
    fn settle(&self, image: &SelectedImage, restore: bool) -> bool {
        self.trigger.set_busy(false);
        let mut state = self.state.lock();
        state.busy = false;
        let empty = state.selected.is_none();
        if empty && restore {
            state.selected = Some(image.clone());
        }
        empty
    }

    async fn run(&self, image: &SelectedImage) -> Result<ConversionReport, Img2PdfError> {
        let start = Instant::now();

        if self.config.startup_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.startup_delay_ms)).await;
        }

        let generated = convert_image(image, &self.config).await?;
        let location = self.sink.save(&generated.filename, &generated.bytes).await?;
        debug!("Handed {} to sink at {}", generated.filename, location);

        Ok(ConversionReport {
            source_name: image.name.clone(),
            output_name: generated.filename,
            media_type: image.media_type,
            image_width: generated.image_width,
            image_height: generated.image_height,
            page_width_pt: generated.page.width_pt,
            page_height_pt: generated.page.height_pt,
            pdf_bytes: generated.bytes.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Settles the busy state when a conversion future is dropped before it
/// completes, e.g. under `tokio::time::timeout`.
struct InFlight<'a> {
    converter: &'a Converter,
    image: Option<SelectedImage>,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.image = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(image) = self.image.take() {
            warn!("Conversion of {} was cancelled", image.name);
            self.converter.settle(&image, true);
        }
    }
}
