//! Wires the components to one shared state and one toast notifier.

use crate::celebrate::{Celebration, NoCelebration};
use crate::config::ConverterConfig;
use crate::convert::{Converter, NoopTriggerView, TriggerView};
use crate::dropzone::{DropZone, DropZoneView, NoopDropZoneView};
use crate::intake::{FileIntake, NoopPreviewView, PreviewView};
use crate::sink::DocumentSink;
use crate::state::SharedState;
use crate::toast::{NoopToastSurface, ToastNotifier, ToastSurface};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Greeting shown shortly after start-up.
pub const GREETING: &str = "✨ Drag & drop your images here!";

/// The rendering side of the application, supplied by the front end.
#[derive(Clone)]
pub struct Surfaces {
    pub toast: Arc<dyn ToastSurface>,
    pub preview: Arc<dyn PreviewView>,
    pub drop_zone: Arc<dyn DropZoneView>,
    pub trigger: Arc<dyn TriggerView>,
    pub celebration: Arc<dyn Celebration>,
}

impl Default for Surfaces {
    fn default() -> Self {
        Self {
            toast: Arc::new(NoopToastSurface),
            preview: Arc::new(NoopPreviewView),
            drop_zone: Arc::new(NoopDropZoneView),
            trigger: Arc::new(NoopTriggerView),
            celebration: Arc::new(NoCelebration),
        }
    }
}

/// A fully wired converter front end.
#[derive(Clone, Debug)]
pub struct App {
    config: ConverterConfig,
    state: SharedState,
    notifier: ToastNotifier,
    intake: FileIntake,
    drop_zone: DropZone,
    converter: Converter,
}

impl App {
    pub fn new(config: ConverterConfig, surfaces: Surfaces, sink: Arc<dyn DocumentSink>) -> Self {
        let state = SharedState::new();
        let notifier = ToastNotifier::new(
            surfaces.toast,
            Duration::from_millis(config.toast_duration_ms),
        );
        let intake = FileIntake::new(state.clone(), surfaces.preview, notifier.clone());
        let drop_zone = DropZone::new(surfaces.drop_zone, intake.clone());
        let converter = Converter::new(
            config.clone(),
            intake.clone(),
            notifier.clone(),
            surfaces.trigger,
            sink,
            surfaces.celebration,
        );

        Self {
            config,
            state,
            notifier,
            intake,
            drop_zone,
            converter,
        }
    }

    /// Show the greeting toast after the configured delay.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn greet(&self) -> JoinHandle<()> {
        let notifier = self.notifier.clone();
        let delay = Duration::from_millis(self.config.greeting_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.info(GREETING);
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn notifier(&self) -> &ToastNotifier {
        &self.notifier
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }
}
