//! Configuration constants with units and validation.
//!
//! Everything here is fixed at construction time:
//! - Display geometry (widths in pixels)
//! - FFT and refill sizes (frames)
//! - Animation physics (seconds-based)

mod analysis;
mod playback;

use crate::error::Result;

// Re-export all types
pub use analysis::SpectrumConfig;
pub use playback::{playback_constants, PlaybackConfig};

/// Complete visualizer configuration
#[derive(Debug, Clone, Default)]
pub struct VisualizerConfig {
    pub spectrum: SpectrumConfig,
    pub playback: PlaybackConfig,
}

impl VisualizerConfig {
    /// Validate every section, failing on the first invalid constant
    pub fn validate(&self) -> Result<()> {
        self.spectrum.validate()?;
        self.playback.validate()
    }
}
