//! The celebratory burst fired after a successful save.
//!
//! Purely cosmetic: the orchestrator hands a [`ConfettiBurst`] to the injected
//! [`Celebration`] and never waits for or inspects the result.

use serde::{Deserialize, Serialize};

/// Parameters of one confetti burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiBurst {
    pub particle_count: u32,
    /// Spread angle in degrees.
    pub spread: u32,
    /// Vertical origin as a fraction of the viewport height.
    pub origin_y: f32,
    pub colors: Vec<String>,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self {
            particle_count: 150,
            spread: 70,
            origin_y: 0.6,
            colors: ["#4361ee", "#3a0ca3", "#f72585", "#4cc9f0"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Renders a burst. Must return promptly; anything long-running belongs on
/// a spawned task.
pub trait Celebration: Send + Sync {
    fn celebrate(&self, burst: &ConfettiBurst);
}

/// A celebration that does nothing.
pub struct NoCelebration;

impl Celebration for NoCelebration {
    fn celebrate(&self, _burst: &ConfettiBurst) {}
}
