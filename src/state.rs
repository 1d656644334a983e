//! Application state shared by the intake and the orchestrator.
//!
//! One staging slot and one busy flag, owned by [`crate::app::App`] and handed
//! to each component as a [`SharedState`]. Locks are short and never held
//! across an `.await`.

use crate::intake::SelectedImage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The mutable part of the application.
#[derive(Debug, Default)]
pub struct AppState {
    /// The single image staged for conversion, if any.
    pub selected: Option<SelectedImage>,
    /// True while a conversion pipeline is running.
    pub busy: bool,
}

/// Cloneable handle to the application state.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<Mutex<AppState>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the state. A panic in another holder does not leave the state
    /// half-written (every mutation is a single assignment), so a poisoned
    /// lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, AppState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the staged image.
    pub fn selected(&self) -> Option<SelectedImage> {
        self.lock().selected.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }
}
