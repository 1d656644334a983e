//! Drop zone: the drag-and-drop and click-to-browse entry points.
//!
//! Every drag phase, on the drop zone and on the surrounding document, must
//! suppress the host's default handling; otherwise dropping an image outside
//! the zone navigates away to the file. Only a drop on the zone itself
//! stages anything.

use crate::error::IntakeError;
use crate::intake::{CandidateFile, FileIntake};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Where a drag event was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    DropZone,
    Document,
}

/// One stage of the drag lifecycle. A drop carries the dropped files.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<CandidateFile>),
}

/// What the host must do with the event after we handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl DragResponse {
    pub const SUPPRESS: DragResponse = DragResponse {
        prevent_default: true,
        stop_propagation: true,
    };
}

/// The visual drop target.
pub trait DropZoneView: Send + Sync {
    /// Toggle the active/highlighted look.
    fn set_highlighted(&self, highlighted: bool);

    /// Open the host's file picker. Its result should be passed to
    /// [`DropZone::picked`].
    fn open_file_picker(&self) {}
}

/// A drop zone that renders nothing.
pub struct NoopDropZoneView;

impl DropZoneView for NoopDropZoneView {
    fn set_highlighted(&self, _highlighted: bool) {}
}

/// Routes drag and click gestures into the [`FileIntake`].
#[derive(Clone)]
pub struct DropZone {
    view: Arc<dyn DropZoneView>,
    intake: FileIntake,
    highlighted: Arc<AtomicBool>,
}

impl fmt::Debug for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropZone")
            .field("highlighted", &self.is_highlighted())
            .finish()
    }
}

impl DropZone {
    pub fn new(view: Arc<dyn DropZoneView>, intake: FileIntake) -> Self {
        Self {
            view,
            intake,
            highlighted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle one drag event delivered to `target`.
    ///
    /// Always answers [`DragResponse::SUPPRESS`]. The highlight follows the
    /// zone's own events only and is removed on leave and on drop whatever
    /// the drop contained.
    pub fn on_drag(&self, target: DragTarget, event: DragEvent) -> DragResponse {
        if target == DragTarget::Document {
            return DragResponse::SUPPRESS;
        }

        match event {
            DragEvent::Enter | DragEvent::Over => self.set_highlighted(true),
            DragEvent::Leave => self.set_highlighted(false),
            DragEvent::Drop(files) => {
                self.set_highlighted(false);
                debug!("Drop with {} file(s)", files.len());
                // Rejections are already reported to the user by the intake.
                let _ = self.intake.select_files(files);
            }
        }

        DragResponse::SUPPRESS
    }

    /// The zone was clicked: ask the host for its file picker.
    pub fn click(&self) {
        self.view.open_file_picker();
    }

    /// Result of the file picker.
    pub fn picked(&self, files: Vec<CandidateFile>) -> Result<(), IntakeError> {
        self.intake.select_files(files)
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted.load(Ordering::SeqCst)
    }

    fn set_highlighted(&self, on: bool) {
        if self.highlighted.swap(on, Ordering::SeqCst) != on {
            self.view.set_highlighted(on);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::NoopPreviewView;
    use crate::state::SharedState;
    use crate::toast::{NoopToastSurface, ToastNotifier};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct ZoneView {
        changes: Mutex<Vec<bool>>,
        picker_opened: AtomicUsize,
    }

    impl DropZoneView for ZoneView {
        fn set_highlighted(&self, highlighted: bool) {
            self.changes.lock().unwrap().push(highlighted);
        }

        fn open_file_picker(&self) {
            self.picker_opened.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn zone() -> (DropZone, Arc<ZoneView>, SharedState) {
        let state = SharedState::new();
        let notifier = ToastNotifier::new(Arc::new(NoopToastSurface), Duration::from_secs(3));
        let intake = FileIntake::new(state.clone(), Arc::new(NoopPreviewView), notifier);
        let view = Arc::new(ZoneView::default());
        (DropZone::new(view.clone(), intake), view, state)
    }

    #[test]
    fn every_phase_is_suppressed_on_both_targets() {
        let (zone, _view, _state) = zone();
        for target in [DragTarget::DropZone, DragTarget::Document] {
            for event in [
                DragEvent::Enter,
                DragEvent::Over,
                DragEvent::Leave,
                DragEvent::Drop(Vec::new()),
            ] {
                assert_eq!(zone.on_drag(target, event), DragResponse::SUPPRESS);
            }
        }
    }

    #[test]
    fn highlight_follows_enter_and_leave() {
        let (zone, view, _state) = zone();
        zone.on_drag(DragTarget::DropZone, DragEvent::Enter);
        zone.on_drag(DragTarget::DropZone, DragEvent::Over);
        assert!(zone.is_highlighted());
        zone.on_drag(DragTarget::DropZone, DragEvent::Leave);
        assert!(!zone.is_highlighted());
        assert_eq!(*view.changes.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn drop_unhighlights_even_when_rejected() {
        let (zone, _view, state) = zone();
        zone.on_drag(DragTarget::DropZone, DragEvent::Over);
        zone.on_drag(
            DragTarget::DropZone,
            DragEvent::Drop(vec![CandidateFile::from_bytes("doc.pdf", "application/pdf", vec![1])]),
        );
        assert!(!zone.is_highlighted());
        assert!(state.selected().is_none());
    }

    #[test]
    fn drop_on_zone_stages_first_file() {
        let (zone, _view, state) = zone();
        zone.on_drag(
            DragTarget::DropZone,
            DragEvent::Drop(vec![CandidateFile::from_bytes("pic.png", "image/png", vec![1])]),
        );
        assert_eq!(state.selected().unwrap().name, "pic.png");
    }

    #[test]
    fn drop_on_document_is_swallowed() {
        let (zone, _view, state) = zone();
        zone.on_drag(
            DragTarget::Document,
            DragEvent::Drop(vec![CandidateFile::from_bytes("pic.png", "image/png", vec![1])]),
        );
        assert!(state.selected().is_none());
    }

    #[test]
    fn click_opens_picker_and_picked_selects() {
        let (zone, view, state) = zone();
        zone.click();
        assert_eq!(view.picker_opened.load(Ordering::SeqCst), 1);
        zone.picked(vec![CandidateFile::from_bytes("a.jpg", "image/jpeg", vec![0])])
            .unwrap();
        assert!(state.selected().is_some());
    }
}
