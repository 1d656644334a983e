//! Build stage: bitmap + page layout → single-page PDF bytes.
//!
//! The bitmap is embedded as a baseline JPEG (`DCTDecode`) image XObject and
//! drawn with one transform so it fills the page exactly from the origin.
//! JPEG has no alpha channel, so transparent pixels are composited onto white
//! first. Like decoding, this is CPU-bound and runs in `spawn_blocking`.

use crate::error::Img2PdfError;
use crate::pipeline::layout::PageLayout;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

/// Value written to the document's `/Producer` entry.
pub const PRODUCER: &str = concat!("img2pdf ", env!("CARGO_PKG_VERSION"));

/// Resource name of the page image.
const IMAGE_NAME: &str = "Im0";

/// Build a one-page PDF showing `img` over the whole `layout`.
///
/// `title` goes into the document information dictionary.
pub async fn build_pdf(
    img: DynamicImage,
    layout: PageLayout,
    title: &str,
    jpeg_quality: u8,
) -> Result<Vec<u8>, Img2PdfError> {
    let title = title.to_string();
    tokio::task::spawn_blocking(move || build_pdf_blocking(&img, layout, &title, jpeg_quality))
        .await
        .map_err(|e| Img2PdfError::Internal(format!("PDF task panicked: {}", e)))?
}

/// Blocking implementation of [`build_pdf`].
pub fn build_pdf_blocking(
    img: &DynamicImage,
    layout: PageLayout,
    title: &str,
    jpeg_quality: u8,
) -> Result<Vec<u8>, Img2PdfError> {
    let rgb = flatten_onto_white(img);
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality)
        .encode_image(&rgb)
        .map_err(|e| Img2PdfError::PdfBuildFailed(format!("JPEG encoding failed: {e}")))?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(layout.width_pt),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(layout.height_pt),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content
        .encode()
        .map_err(|e| Img2PdfError::PdfBuildFailed(format!("content stream: {e}")))?;
    let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(layout.width_pt),
            Object::Real(layout.height_pt),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| Img2PdfError::PdfBuildFailed(format!("serialisation: {e}")))?;

    debug!(
        "Built PDF: {}x{} px image on {:.2}x{:.2} pt page → {} bytes",
        width,
        height,
        layout.width_pt,
        layout.height_pt,
        out.len()
    );
    Ok(out)
}

/// Drop the alpha channel by compositing over a white background.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let [r, g, b, a] = src.0;
        let a = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        *dst = Rgb([blend(r), blend(g), blend(b)]);
    }
    out
}
