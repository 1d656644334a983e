//! Page geometry and output naming.

use crate::error::Img2PdfError;
use serde::{Deserialize, Serialize};

/// Size of the single generated page, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageLayout {
    /// Fixed width, height scaled to keep the image's aspect ratio:
    /// `height = image_height * page_width / image_width`.
    pub fn scale_to_width(
        image_width: u32,
        image_height: u32,
        page_width_pt: f32,
    ) -> Result<Self, Img2PdfError> {
        if !page_width_pt.is_finite() || page_width_pt <= 0.0 {
            return Err(Img2PdfError::InvalidConfig(format!(
                "Page width must be a positive number of points, got {}",
                page_width_pt
            )));
        }
        if image_width == 0 || image_height == 0 {
            return Err(Img2PdfError::EmptyImage {
                width: image_width,
                height: image_height,
            });
        }

        let height_pt = (f64::from(image_height) * f64::from(page_width_pt)
            / f64::from(image_width)) as f32;

        Ok(Self {
            width_pt: page_width_pt,
            height_pt,
        })
    }
}

/// Name of the generated PDF: everything before the first `.` of the source
/// name, plus `.pdf`.
///
/// Any directory part of the name is dropped. Names with several dots lose
/// everything after the first one:
///
/// ```rust
/// use img2pdf::pipeline::layout::output_filename;
///
/// assert_eq!(output_filename("photo.jpg"), "photo.pdf");
/// assert_eq!(output_filename("my.photo.jpg"), "my.pdf");
/// ```
pub fn output_filename(source_name: &str) -> String {
    let file_name = source_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let base = file_name.split('.').next().unwrap_or_default();
    format!("{base}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_image_gives_half_height_page() {
        let page = PageLayout::scale_to_width(800, 400, 595.28).unwrap();
        assert_eq!(page.width_pt, 595.28);
        assert!((page.height_pt - 297.64).abs() < 1e-3, "{page:?}");
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        for (w, h) in [(1, 1), (3000, 4000), (1920, 1080), (7, 1234)] {
            let page = PageLayout::scale_to_width(w, h, 612.0).unwrap();
            let expected = h as f64 / w as f64;
            let actual = page.height_pt as f64 / page.width_pt as f64;
            assert!((expected - actual).abs() < 1e-5, "{w}x{h}: {actual}");
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(PageLayout::scale_to_width(0, 10, 595.28).is_err());
        assert!(PageLayout::scale_to_width(10, 0, 595.28).is_err());
    }

    #[test]
    fn degenerate_page_width_is_rejected() {
        for width in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = PageLayout::scale_to_width(800, 400, width).unwrap_err();
            assert!(matches!(err, Img2PdfError::InvalidConfig(_)), "{width}: {err}");
        }
    }

    #[test]
    fn filename_truncates_at_first_dot() {
        assert_eq!(output_filename("photo.jpg"), "photo.pdf");
        assert_eq!(output_filename("my.photo.jpg"), "my.pdf");
        assert_eq!(output_filename("scan"), "scan.pdf");
        assert_eq!(output_filename(".hidden.png"), ".pdf");
    }

    #[test]
    fn filename_drops_directory_part() {
        assert_eq!(output_filename("/x/outside/evil.png"), "evil.pdf");
        assert_eq!(output_filename("../up.one.jpg"), "up.pdf");
        assert_eq!(output_filename(r"C:\scans\page.webp"), "page.pdf");
    }
}
