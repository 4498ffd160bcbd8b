//! Search presets: which feature strategy to use and how strict to be.

use serde::{Deserialize, Serialize};

use super::features::FeatureStrategy;
use super::peaks::DEFAULT_DEDUP_RADIUS;

/// Everything a search needs besides the two images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchPreset {
    pub strategy: FeatureStrategy,
    /// Candidates must score strictly above this, in `[0, 1]`.
    pub cutoff: f32,
    #[serde(default = "default_dedup_radius")]
    pub dedup_radius: u32,
}

fn default_dedup_radius() -> u32 {
    DEFAULT_DEDUP_RADIUS
}

impl SearchPreset {
    /// Rendered text and other crisp, high-contrast bitmaps.
    pub const THRESHOLD: SearchPreset = SearchPreset {
        strategy: FeatureStrategy::Threshold,
        cutoff: 0.85,
        dedup_radius: DEFAULT_DEDUP_RADIUS,
    };

    /// Icons and templates captured from noisy or anti-aliased screens.
    pub const EDGES: SearchPreset = SearchPreset {
        strategy: FeatureStrategy::Edge,
        cutoff: 0.95,
        dedup_radius: DEFAULT_DEDUP_RADIUS,
    };

    pub fn with_cutoff(self, cutoff: f32) -> Self {
        Self { cutoff, ..self }
    }
}

impl Default for SearchPreset {
    fn default() -> Self {
        Self::THRESHOLD
    }
}
