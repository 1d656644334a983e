//! Toast notifications: transient, auto-hiding status messages.
//!
//! The notifier owns the timing; rendering is delegated to an injected
//! [`ToastSurface`] so the same logic drives a terminal, a test recorder, or
//! any other front end.
//!
//! # Re-entrancy
//!
//! A new toast preempts the visible one immediately and restarts the hide
//! timer. Every `notify` bumps a generation counter and aborts the pending
//! hide; a hide task that still wakes up only acts if its generation is
//! current, so an old timer can never hide a newer message.
//!
//! # Example
//!
//! ```rust
//! use img2pdf::toast::{Severity, ToastMessage, ToastNotifier, ToastSurface};
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct Recorder(Mutex<Vec<String>>);
//!
//! impl ToastSurface for Recorder {
//!     fn show(&self, toast: &ToastMessage) {
//!         self.0.lock().unwrap().push(toast.text.clone());
//!     }
//! }
//!
//! let recorder = Arc::new(Recorder::default());
//! let notifier = ToastNotifier::new(recorder.clone(), Duration::from_secs(3));
//! notifier.notify("Saved", Severity::Success);
//! assert_eq!(recorder.0.lock().unwrap().as_slice(), ["Saved"]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// Severity of a toast; selects its icon and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Font Awesome icon class.
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "fa-info-circle",
            Severity::Success => "fa-check-circle",
            Severity::Warning => "fa-exclamation-triangle",
            Severity::Error => "fa-exclamation-circle",
        }
    }

    /// Accent colour of the icon and the start of the progress gradient.
    pub fn color(self) -> &'static str {
        match self {
            Severity::Info => "#4361ee",
            Severity::Success => "#4cc9f0",
            Severity::Warning => "#f8961e",
            Severity::Error => "#ef233c",
        }
    }

    /// End colour of the progress gradient.
    pub fn gradient_end(self) -> &'static str {
        match self {
            Severity::Success => "#3a0ca3",
            _ => "#f72585",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// One displayed notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastMessage {
    pub text: String,
    pub severity: Severity,
    /// Monotonic counter; the most recent toast has the highest value.
    pub generation: u64,
}

impl ToastMessage {
    pub fn icon(&self) -> &'static str {
        self.severity.icon()
    }

    pub fn color(&self) -> &'static str {
        self.severity.color()
    }

    pub fn gradient_end(&self) -> &'static str {
        self.severity.gradient_end()
    }
}

/// Where toasts are rendered.
///
/// Called with the notifier's internal lock held: implementations must not
/// call back into the [`ToastNotifier`].
pub trait ToastSurface: Send + Sync {
    /// Display `toast`, replacing whatever is shown.
    fn show(&self, toast: &ToastMessage);

    /// Remove the visible toast.
    fn hide(&self) {}
}

/// A surface that renders nothing.
pub struct NoopToastSurface;

impl ToastSurface for NoopToastSurface {
    fn show(&self, _toast: &ToastMessage) {}
}

#[derive(Default)]
struct ToastState {
    generation: u64,
    visible: Option<ToastMessage>,
    pending_hide: Option<AbortHandle>,
}

/// Shows toasts on a [`ToastSurface`] and hides them after a fixed duration.
#[derive(Clone)]
pub struct ToastNotifier {
    surface: Arc<dyn ToastSurface>,
    duration: Duration,
    state: Arc<Mutex<ToastState>>,
}

impl fmt::Debug for ToastNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastNotifier")
            .field("surface", &"<dyn ToastSurface>")
            .field("duration", &self.duration)
            .field("visible", &self.current())
            .finish()
    }
}

impl ToastNotifier {
    pub fn new(surface: Arc<dyn ToastSurface>, duration: Duration) -> Self {
        Self {
            surface,
            duration,
            state: Arc::new(Mutex::new(ToastState::default())),
        }
    }

    /// Show `text` with the given severity and schedule its hide.
    ///
    /// Must be called from within a tokio runtime for the hide to be
    /// scheduled; outside one the toast simply stays up until replaced.
    pub fn notify(&self, text: impl Into<String>, severity: Severity) {
        let text = text.into();
        match severity {
            Severity::Error | Severity::Warning => warn!("toast [{}] {}", severity, text),
            _ => info!("toast [{}] {}", severity, text),
        }

        let mut state = self.lock();
        state.generation += 1;
        let toast = ToastMessage {
            text,
            severity,
            generation: state.generation,
        };

        if let Some(pending) = state.pending_hide.take() {
            pending.abort();
        }

        self.surface.show(&toast);
        state.pending_hide = self.schedule_hide(toast.generation);
        state.visible = Some(toast);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.notify(text, Severity::Info);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.notify(text, Severity::Success);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.notify(text, Severity::Warning);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.notify(text, Severity::Error);
    }

    /// The toast currently visible, if any.
    pub fn current(&self) -> Option<ToastMessage> {
        self.lock().visible.clone()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn lock(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_hide(&self, generation: u64) -> Option<AbortHandle> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                warn!("No async runtime; toast {} will not auto-hide", generation);
                return None;
            }
        };

        let state = Arc::clone(&self.state);
        let surface = Arc::clone(&self.surface);
        let duration = self.duration;

        let task = handle.spawn(async move {
            tokio::time::sleep(duration).await;
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                debug!("Hiding toast {}", generation);
                state.visible = None;
                state.pending_hide = None;
                surface.hide();
            }
        });

        Some(task.abort_handle())
    }
}
