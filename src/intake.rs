//! File intake: validate a user-provided image and stage it for conversion.
//!
//! Both gestures of the front end end up here: the file picker calls
//! [`FileIntake::select_files`] with its result, and a drop on the drop zone
//! (see [`crate::dropzone`]) does the same with the dropped list. Only the
//! declared media type is checked; content is never sniffed at this point.

use crate::error::IntakeError;
use crate::state::SharedState;
use crate::toast::ToastNotifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Preview text shown while nothing is staged.
pub const NAME_PLACEHOLDER: &str = "No file selected";
/// Size text shown while nothing is staged.
pub const SIZE_PLACEHOLDER: &str = "-";

// ── Media types ──────────────────────────────────────────────────────────

/// The image types accepted for conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Jpeg, MediaType::Png, MediaType::Webp];

    /// Exact-match lookup of a declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/webp" => Some(MediaType::Webp),
            _ => None,
        }
    }

    pub fn as_mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
        }
    }

    /// Decoder format for this media type.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            MediaType::Jpeg => image::ImageFormat::Jpeg,
            MediaType::Png => image::ImageFormat::Png,
            MediaType::Webp => image::ImageFormat::WebP,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

// ── Files ────────────────────────────────────────────────────────────────

/// Handle to a file's bytes: already in memory, or still on disk.
#[derive(Clone)]
pub enum FileContent {
    Memory(Arc<[u8]>),
    Path(PathBuf),
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContent::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            FileContent::Path(path) => write!(f, "Path({})", path.display()),
        }
    }
}

/// A file offered by the user, not yet validated.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Display name (no directory part).
    pub name: String,
    /// Declared MIME type; empty when unknown.
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
    pub content: FileContent,
}

impl CandidateFile {
    /// A candidate whose bytes are already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            content: FileContent::Memory(Arc::from(bytes)),
        }
    }

    /// A candidate backed by a file on disk.
    ///
    /// The declared type is guessed from the extension, the way a browser
    /// fills in `File.type`; the bytes are only read when a conversion runs.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| IntakeError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = mime_guess::from_path(path).first_raw().unwrap_or("");

        debug!("Candidate {} ({}, {} bytes)", name, media_type, metadata.len());

        Ok(Self {
            name,
            media_type: media_type.to_string(),
            size: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }
}

/// The validated image currently staged for conversion.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub name: String,
    pub media_type: MediaType,
    pub size: u64,
    pub content: FileContent,
}

// ── Preview surface ──────────────────────────────────────────────────────

/// The preview region showing the staged file.
pub trait PreviewView: Send + Sync {
    fn set_file_name(&self, name: &str);
    fn set_file_size(&self, size: &str);
    fn set_preview_visible(&self, visible: bool);
}

/// A preview that renders nothing.
pub struct NoopPreviewView;

impl PreviewView for NoopPreviewView {
    fn set_file_name(&self, _name: &str) {}
    fn set_file_size(&self, _size: &str) {}
    fn set_preview_visible(&self, _visible: bool) {}
}

// ── Size formatting ──────────────────────────────────────────────────────

const SIZE_UNITS: [&str; 7] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Human-readable size in base 1024 with one decimal place.
///
/// ```rust
/// use img2pdf::intake::format_size;
///
/// assert_eq!(format_size(0), "0 Bytes");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut index = 0;
    let mut scale: u64 = 1;
    while index + 1 < SIZE_UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        index += 1;
    }

    format!("{:.1} {}", bytes as f64 / scale as f64, SIZE_UNITS[index])
}

// ── Intake ───────────────────────────────────────────────────────────────

/// Validates candidates and keeps the preview in sync with the staging slot.
#[derive(Clone)]
pub struct FileIntake {
    state: SharedState,
    view: Arc<dyn PreviewView>,
    notifier: ToastNotifier,
}

impl fmt::Debug for FileIntake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileIntake")
            .field("state", &self.state)
            .field("view", &"<dyn PreviewView>")
            .finish()
    }
}

impl FileIntake {
    pub fn new(state: SharedState, view: Arc<dyn PreviewView>, notifier: ToastNotifier) -> Self {
        Self {
            state,
            view,
            notifier,
        }
    }

    /// Validate `candidate` and stage it.
    ///
    /// On rejection one error toast is shown and the staging slot, including
    /// any previously staged image, is left as it was.
    pub fn select_file(&self, candidate: CandidateFile) -> Result<(), IntakeError> {
        let Some(media_type) = MediaType::from_mime(&candidate.media_type) else {
            self.notifier
                .error("❌ Please upload a valid image file (JPG, PNG, WEBP)");
            return Err(IntakeError::UnsupportedType {
                name: candidate.name,
                media_type: candidate.media_type,
            });
        };

        let size_text = format_size(candidate.size);
        info!("Staged {} ({}, {})", candidate.name, media_type, size_text);

        self.view.set_file_name(&candidate.name);
        self.view.set_file_size(&size_text);
        self.view.set_preview_visible(true);

        self.state.lock().selected = Some(SelectedImage {
            name: candidate.name,
            media_type,
            size: candidate.size,
            content: candidate.content,
        });

        self.notifier.success("📄 Image loaded successfully!");
        Ok(())
    }

    /// Stage the first of `files`, as a picker or a drop delivers them.
    ///
    /// An empty list changes nothing and shows no toast.
    pub fn select_files(
        &self,
        files: impl IntoIterator<Item = CandidateFile>,
    ) -> Result<(), IntakeError> {
        match files.into_iter().next() {
            Some(first) => self.select_file(first),
            None => {
                debug!("Selection carried no files");
                Err(IntakeError::NoFiles)
            }
        }
    }

    /// Unstage the current image and reset the preview.
    pub fn clear(&self) {
        self.state.lock().selected = None;
        self.reset_preview();
        self.notifier.info("🗑️ File removed");
    }

    /// Put the preview back to its placeholders without touching the slot.
    pub(crate) fn reset_preview(&self) {
        self.view.set_file_name(NAME_PLACEHOLDER);
        self.view.set_file_size(SIZE_PLACEHOLDER);
        self.view.set_preview_visible(false);
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::{Severity, ToastMessage, ToastSurface};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Preview {
        name: Mutex<String>,
        size: Mutex<String>,
        visible: Mutex<bool>,
    }

    impl PreviewView for Preview {
        fn set_file_name(&self, name: &str) {
            *self.name.lock().unwrap() = name.to_string();
        }
        fn set_file_size(&self, size: &str) {
            *self.size.lock().unwrap() = size.to_string();
        }
        fn set_preview_visible(&self, visible: bool) {
            *self.visible.lock().unwrap() = visible;
        }
    }

    #[derive(Default)]
    struct Toasts(Mutex<Vec<Severity>>);

    impl ToastSurface for Toasts {
        fn show(&self, toast: &ToastMessage) {
            self.0.lock().unwrap().push(toast.severity);
        }
    }

    fn intake() -> (FileIntake, Arc<Preview>, Arc<Toasts>) {
        let preview = Arc::new(Preview::default());
        let toasts = Arc::new(Toasts::default());
        let notifier = ToastNotifier::new(toasts.clone(), Duration::from_secs(3));
        let intake = FileIntake::new(SharedState::new(), preview.clone(), notifier);
        (intake, preview, toasts)
    }

    #[test]
    fn format_size_reference_values() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1), "1.0 Bytes");
        assert_eq!(format_size(1023), "1023.0 Bytes");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn format_size_beyond_gigabytes() {
        assert_eq!(format_size(1u64 << 40), "1.0 TB");
        assert_eq!(format_size(1u64 << 50), "1.0 PB");
        assert_eq!(format_size(u64::MAX), "16.0 EB");
    }

    #[test]
    fn media_type_is_exact_match() {
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("image/webp"), Some(MediaType::Webp));
        assert_eq!(MediaType::from_mime("IMAGE/PNG"), None);
        assert_eq!(MediaType::from_mime("image/gif"), None);
        assert_eq!(MediaType::from_mime(""), None);
        for t in MediaType::ALL {
            assert_eq!(MediaType::from_mime(t.as_mime()), Some(t));
        }
    }

    #[test]
    fn valid_file_updates_preview() {
        let (intake, preview, toasts) = intake();
        intake
            .select_file(CandidateFile::from_bytes("cat.png", "image/png", vec![0u8; 1536]))
            .unwrap();

        assert_eq!(*preview.name.lock().unwrap(), "cat.png");
        assert_eq!(*preview.size.lock().unwrap(), "1.5 KB");
        assert!(*preview.visible.lock().unwrap());
        assert_eq!(*toasts.0.lock().unwrap(), vec![Severity::Success]);

        let staged = intake.state().selected().unwrap();
        assert_eq!(staged.media_type, MediaType::Png);
        assert_eq!(staged.size, 1536);
    }

    #[test]
    fn invalid_file_keeps_previous_selection() {
        let (intake, preview, toasts) = intake();
        intake
            .select_file(CandidateFile::from_bytes("a.jpg", "image/jpeg", vec![1, 2, 3]))
            .unwrap();
        toasts.0.lock().unwrap().clear();

        let err = intake
            .select_file(CandidateFile::from_bytes("b.gif", "image/gif", vec![4]))
            .unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedType { .. }));

        assert_eq!(intake.state().selected().unwrap().name, "a.jpg");
        assert_eq!(*preview.name.lock().unwrap(), "a.jpg");
        assert_eq!(*toasts.0.lock().unwrap(), vec![Severity::Error]);
    }

    #[test]
    fn clear_resets_preview() {
        let (intake, preview, toasts) = intake();
        intake
            .select_file(CandidateFile::from_bytes("a.webp", "image/webp", vec![0; 10]))
            .unwrap();
        intake.clear();

        assert!(intake.state().selected().is_none());
        assert_eq!(*preview.name.lock().unwrap(), NAME_PLACEHOLDER);
        assert_eq!(*preview.size.lock().unwrap(), SIZE_PLACEHOLDER);
        assert!(!*preview.visible.lock().unwrap());
        assert_eq!(toasts.0.lock().unwrap().last(), Some(&Severity::Info));
    }

    #[test]
    fn select_files_takes_first_and_ignores_empty() {
        let (intake, _preview, toasts) = intake();
        assert!(matches!(
            intake.select_files(Vec::new()),
            Err(IntakeError::NoFiles)
        ));
        assert!(toasts.0.lock().unwrap().is_empty());

        intake
            .select_files(vec![
                CandidateFile::from_bytes("one.png", "image/png", vec![0]),
                CandidateFile::from_bytes("two.png", "image/png", vec![0]),
            ])
            .unwrap();
        assert_eq!(intake.state().selected().unwrap().name, "one.png");
    }

    #[test]
    fn from_path_guesses_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.jpeg");
        std::fs::write(&path, [0u8; 42]).unwrap();

        let candidate = CandidateFile::from_path(&path).unwrap();
        assert_eq!(candidate.name, "holiday.jpeg");
        assert_eq!(candidate.media_type, "image/jpeg");
        assert_eq!(candidate.size, 42);

        let missing = CandidateFile::from_path(dir.path().join("nope.png"));
        assert!(matches!(missing, Err(IntakeError::Unreadable { .. })));
    }
}
