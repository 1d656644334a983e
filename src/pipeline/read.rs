//! Read stage: staged file content → `data:` URL.
//!
//! The staged image is either already in memory or still a path on disk; both
//! end up as a base64 `data:<type>;base64,<payload>` URL, the same shape a
//! browser's `FileReader.readAsDataURL` produces. Base64 work runs on the
//! blocking pool since photos are often several megabytes.

use crate::error::Img2PdfError;
use crate::intake::{FileContent, MediaType, SelectedImage};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tracing::debug;

/// A parsed `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type from the URL header.
    pub media_type: String,
    /// Base64 payload (standard alphabet, padded).
    pub payload: String,
}

impl DataUrl {
    /// Encode `bytes` as a data URL of the given type.
    pub fn encode(media_type: MediaType, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.as_mime().to_string(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Parse `data:<type>;base64,<payload>`. Only base64 URLs are accepted.
    pub fn parse(url: &str) -> Result<Self, Img2PdfError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Img2PdfError::InvalidDataUrl {
                detail: "missing 'data:' scheme".into(),
            })?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Img2PdfError::InvalidDataUrl {
                detail: "missing ',' separator".into(),
            })?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| Img2PdfError::InvalidDataUrl {
                detail: format!("not a base64 URL (header '{header}')"),
            })?;

        Ok(Self {
            media_type: media_type.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Decode the payload back into bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, Img2PdfError> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| Img2PdfError::InvalidDataUrl {
                detail: format!("bad base64 payload: {e}"),
            })
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type, self.payload)
    }
}

/// Read the staged image's bytes and wrap them in a data URL.
pub async fn read_as_data_url(image: &SelectedImage) -> Result<DataUrl, Img2PdfError> {
    let bytes: Arc<[u8]> = match &image.content {
        FileContent::Memory(bytes) => Arc::clone(bytes),
        FileContent::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|source| Img2PdfError::ReadFailed {
                name: image.name.clone(),
                source,
            })?
            .into(),
    };

    let media_type = image.media_type;
    let url = tokio::task::spawn_blocking(move || DataUrl::encode(media_type, &bytes))
        .await
        .map_err(|e| Img2PdfError::Internal(format!("Read task panicked: {}", e)))?;

    debug!(
        "Read {} → {} bytes base64",
        image.name,
        url.payload.len()
    );
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_parse_and_display() {
        let url = DataUrl::encode(MediaType::Png, b"hello");
        let text = url.to_string();
        assert_eq!(text, "data:image/png;base64,aGVsbG8=");
        let parsed = DataUrl::parse(&text).unwrap();
        assert_eq!(parsed, url);
        assert_eq!(parsed.decode_payload().unwrap(), b"hello");
    }

    #[test]
    fn data_url_rejects_malformed_input() {
        assert!(DataUrl::parse("image/png;base64,AAAA").is_err());
        assert!(DataUrl::parse("data:image/png;base64").is_err());
        assert!(DataUrl::parse("data:text/plain,hello").is_err());
        let bad = DataUrl::parse("data:image/png;base64,!!!").unwrap();
        assert!(bad.decode_payload().is_err());
    }

    #[tokio::test]
    async fn read_missing_path_fails() {
        let image = SelectedImage {
            name: "gone.png".into(),
            media_type: MediaType::Png,
            size: 10,
            content: FileContent::Path("/definitely/not/here/gone.png".into()),
        };
        let err = read_as_data_url(&image).await.unwrap_err();
        assert!(matches!(err, Img2PdfError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn read_path_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.jpg");
        std::fs::write(&path, b"abc").unwrap();
        let image = SelectedImage {
            name: "x.jpg".into(),
            media_type: MediaType::Jpeg,
            size: 3,
            content: FileContent::Path(path),
        };
        let url = read_as_data_url(&image).await.unwrap();
        assert_eq!(url.media_type, "image/jpeg");
        assert_eq!(url.decode_payload().unwrap(), b"abc");
    }
}
