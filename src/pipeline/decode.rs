//! Decode stage: data URL → in-memory bitmap.
//!
//! Decoding is CPU-bound, so it runs inside `spawn_blocking`. The declared
//! type picks the decoder first; if the bytes disagree with it (a PNG saved
//! as `.jpg` is common) the content signature is tried next, which is what
//! a browser's image element does too.

use crate::error::Img2PdfError;
use crate::intake::MediaType;
use crate::pipeline::read::DataUrl;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Decode a data URL into a bitmap.
///
/// `name` is only used for error messages.
pub async fn decode_data_url(url: DataUrl, name: &str) -> Result<DynamicImage, Img2PdfError> {
    let name = name.to_string();
    tokio::task::spawn_blocking(move || decode_blocking(&url, &name))
        .await
        .map_err(|e| Img2PdfError::Internal(format!("Decode task panicked: {}", e)))?
}

/// Blocking implementation of [`decode_data_url`].
fn decode_blocking(url: &DataUrl, name: &str) -> Result<DynamicImage, Img2PdfError> {
    let bytes = url.decode_payload()?;

    let declared = MediaType::from_mime(&url.media_type);
    let decoded = match declared {
        Some(media_type) => image::load_from_memory_with_format(&bytes, media_type.image_format())
            .or_else(|declared_err| image::load_from_memory(&bytes).map_err(|_| declared_err)),
        None => image::load_from_memory(&bytes),
    };

    let img = decoded.map_err(|e| Img2PdfError::DecodeFailed {
        name: name.to_string(),
        media_type: url.media_type.clone(),
        detail: e.to_string(),
    })?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(Img2PdfError::EmptyImage { width, height });
    }

    debug!("Decoded {} → {}x{} px", name, width, height);
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 20, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn decodes_png() {
        let url = DataUrl::encode(MediaType::Png, &png_bytes(8, 4));
        let img = decode_data_url(url, "a.png").await.unwrap();
        assert_eq!(img.dimensions(), (8, 4));
    }

    #[tokio::test]
    async fn falls_back_to_signature_when_type_is_wrong() {
        let url = DataUrl::encode(MediaType::Jpeg, &png_bytes(3, 5));
        let img = decode_data_url(url, "really-a-png.jpg").await.unwrap();
        assert_eq!(img.dimensions(), (3, 5));
    }

    #[tokio::test]
    async fn garbage_fails_to_decode() {
        let url = DataUrl::encode(MediaType::Png, b"definitely not an image");
        let err = decode_data_url(url, "junk.png").await.unwrap_err();
        match err {
            Img2PdfError::DecodeFailed { name, media_type, .. } => {
                assert_eq!(name, "junk.png");
                assert_eq!(media_type, "image/png");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
