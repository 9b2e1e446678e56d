//! Playback, peak animation and overview configuration.

use crate::error::{Error, Result};

/// Streaming and animation configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Frames written to the sink per refill
    pub chunk_frames: usize,

    /// Peak marker gravity (bar heights per second²)
    pub gravity: f32,

    /// Restart from frame 0 at end of track
    pub looping: bool,

    /// Start playing as soon as a track is loaded
    pub autoplay: bool,

    /// Column count of the waveform overview (pixels)
    pub overview_width: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            chunk_frames: playback_constants::CHUNK_FRAMES,
            gravity: 2.0,
            looping: true,
            autoplay: true,
            overview_width: 800,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_frames == 0 {
            return Err(Error::Config("chunk size must be > 0".to_string()));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(Error::Config(format!(
                "gravity must be finite and >= 0, got {}",
                self.gravity
            )));
        }
        if self.overview_width == 0 {
            return Err(Error::Config("overview width must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Playback constants
pub mod playback_constants {
    /// Frames per sink refill (= 93ms @ 44.1kHz)
    pub const CHUNK_FRAMES: usize = 4096;

    /// Output frame rate of the frame loop
    pub const TARGET_FPS: u32 = 60;

    /// Short skip step (seconds)
    pub const SKIP_SHORT_SECS: f64 = 10.0;

    /// Long skip step (seconds)
    pub const SKIP_LONG_SECS: f64 = 30.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        PlaybackConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_zero_chunk() {
        let config = PlaybackConfig {
            chunk_frames: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_gravity() {
        let config = PlaybackConfig {
            gravity: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PlaybackConfig {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
