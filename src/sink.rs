//! Document sinks: where a generated PDF is "downloaded" to.
//!
//! The orchestrator only knows the [`DocumentSink`] trait. A browser front
//! end would trigger a download; the CLI writes into a directory with
//! [`DirectorySink`].

use crate::error::Img2PdfError;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Receives the finished document.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Store `bytes` under `filename`. Returns where it ended up, for logs.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, Img2PdfError>;
}

/// Writes documents into a directory.
///
/// Uses atomic write (temp file in the same directory + rename) so a reader
/// never sees a partial PDF. An existing file of the same name is replaced,
/// like a repeated browser download with "replace" chosen.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, Img2PdfError> {
        if !is_plain_file_name(filename) {
            return Err(Img2PdfError::SaveFailed {
                filename: filename.to_string(),
                detail: "file name must not contain a directory part".into(),
            });
        }
        let target = self.dir.join(filename);
        let dir = self.dir.clone();
        let data = bytes.to_vec();
        let path = target.clone();

        let save_err = |detail: String| Img2PdfError::SaveFailed {
            filename: filename.to_string(),
            detail,
        };

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&data)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| Img2PdfError::Internal(format!("Save task panicked: {}", e)))?
        .map_err(|e| save_err(e.to_string()))?;

        info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(target.display().to_string())
    }
}

/// Exactly one normal path component, so a join stays inside the directory.
fn is_plain_file_name(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_sink_writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let location = sink.save("a.pdf", b"%PDF-first").await.unwrap();
        assert!(location.ends_with("a.pdf"));
        sink.save("a.pdf", b"%PDF-second").await.unwrap();

        let written = std::fs::read(dir.path().join("out").join("a.pdf")).unwrap();
        assert_eq!(written, b"%PDF-second");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .collect();
        assert_eq!(leftovers.len(), 1, "temp file must be renamed away");
    }

    #[tokio::test]
    async fn directory_sink_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // A regular file where the directory should be.
        let sink = DirectorySink::new(&blocker);
        let err = sink.save("a.pdf", b"%PDF").await.unwrap_err();
        assert!(matches!(err, Img2PdfError::SaveFailed { .. }));
    }

    #[tokio::test]
    async fn directory_sink_keeps_writes_inside_its_directory() {
        let root = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(root.path().join("sink"));
        let outside = root.path().join("outside").join("evil.pdf");

        for name in [
            outside.to_string_lossy().into_owned(),
            "../evil.pdf".to_string(),
            "nested/evil.pdf".to_string(),
            String::new(),
        ] {
            let err = sink.save(&name, b"%PDF").await.unwrap_err();
            assert!(matches!(err, Img2PdfError::SaveFailed { .. }), "{name}: {err}");
        }
        assert!(!outside.exists());
        assert!(!root.path().join("evil.pdf").exists());
    }
}
