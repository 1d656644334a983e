//! Configuration types for image-to-PDF conversion.
//!
//! Everything tunable about the workflow lives in [`ConverterConfig`], built
//! via [`ConverterConfigBuilder`]. Server settings live in [`ServerConfig`].

use crate::error::Img2PdfError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Width of an A4 page in PDF points (210 mm).
pub const A4_WIDTH_PT: f32 = 595.28;

/// Configuration for the conversion workflow.
///
/// Built via [`ConverterConfig::builder()`] or using
/// [`ConverterConfig::default()`].
///
/// # Example
/// ```rust
/// use img2pdf::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .page_width_pt(612.0)
///     .startup_delay_ms(0)
///     .build()
///     .unwrap();
/// assert_eq!(config.page_width_pt, 612.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Page width in PDF points. The page height follows from the image's
    /// aspect ratio. Default: A4 width (595.28 pt).
    pub page_width_pt: f32,

    /// Cosmetic pause before the pipeline starts, in milliseconds. Default: 800.
    ///
    /// Nothing depends on it; set 0 to disable.
    pub startup_delay_ms: u64,

    /// How long a toast stays visible, in milliseconds. Default: 3000.
    pub toast_duration_ms: u64,

    /// Delay before the welcome toast shown by [`crate::app::App::greet`].
    /// Default: 1000.
    pub greeting_delay_ms: u64,

    /// JPEG quality used when embedding the bitmap (1–100). Default: 92.
    pub jpeg_quality: u8,

    /// Fire the celebration effect after a successful save. Default: true.
    pub celebrate: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            page_width_pt: A4_WIDTH_PT,
            startup_delay_ms: 800,
            toast_duration_ms: 3000,
            greeting_delay_ms: 1000,
            jpeg_quality: 92,
            celebrate: true,
        }
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn page_width_pt(mut self, width: f32) -> Self {
        self.config.page_width_pt = width;
        self
    }

    pub fn startup_delay_ms(mut self, ms: u64) -> Self {
        self.config.startup_delay_ms = ms;
        self
    }

    pub fn toast_duration_ms(mut self, ms: u64) -> Self {
        self.config.toast_duration_ms = ms;
        self
    }

    pub fn greeting_delay_ms(mut self, ms: u64) -> Self {
        self.config.greeting_delay_ms = ms;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn celebrate(mut self, v: bool) -> Self {
        self.config.celebrate = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, Img2PdfError> {
        let c = &self.config;
        if !c.page_width_pt.is_finite() || c.page_width_pt <= 0.0 {
            return Err(Img2PdfError::InvalidConfig(format!(
                "Page width must be a positive number of points, got {}",
                c.page_width_pt
            )));
        }
        if c.toast_duration_ms == 0 {
            return Err(Img2PdfError::InvalidConfig(
                "Toast duration must be ≥ 1 ms".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Settings for the static-file server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as static assets.
    pub public_dir: PathBuf,
    /// File inside `public_dir` answered at `/`.
    pub login_page: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            public_dir: PathBuf::from("public"),
            login_page: "login.html".to_string(),
        }
    }
}

impl ServerConfig {
    /// Path of the page served at `/`.
    pub fn login_path(&self) -> PathBuf {
        self.public_dir.join(&self.login_page)
    }
}
