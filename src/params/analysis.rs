//! Spectrum analysis configuration.

use crate::error::{Error, Result};

/// FFT and bar-binning configuration for the spectrum display
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// FFT window size in frames (must be power of 2)
    pub fft_size: usize,

    /// Width of the spectrum display (pixels)
    pub display_width: usize,

    /// Width of a single bar (pixels)
    pub bar_width: usize,

    /// Logarithmic compression constant `k` in `log(1 + m*k)`
    /// Larger values lift quiet bins closer to loud ones
    pub compression: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            display_width: 800,
            bar_width: 8,
            compression: 16.0,
        }
    }
}

impl SpectrumConfig {
    /// Number of bars that fit the display
    pub fn bar_count(&self) -> usize {
        if self.bar_width == 0 {
            return 0;
        }
        self.display_width / self.bar_width
    }

    /// Number of magnitude bins aggregated into each bar
    pub fn freqs_per_bar(&self) -> usize {
        match self.bar_count() {
            0 => 0,
            bars => self.fft_size / bars / 2,
        }
    }

    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32, sample_rate: u32) -> usize {
        ((hz * self.fft_size as f32) / sample_rate as f32) as usize
    }

    /// Bar index whose bin slice contains `hz`, if that bin is displayed
    pub fn hz_to_bar(&self, hz: f32, sample_rate: u32) -> Option<usize> {
        let per_bar = self.freqs_per_bar();
        if per_bar == 0 {
            return None;
        }
        let bar = self.hz_to_bin(hz, sample_rate) / per_bar;
        (bar < self.bar_count()).then_some(bar)
    }

    /// Validate configuration (FFT size must be power of 2, at least one bin per bar, etc.)
    pub fn validate(&self) -> Result<()> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(Error::Config(format!(
                "FFT size must be a power of 2 >= 2, got {}",
                self.fft_size
            )));
        }
        if self.display_width == 0 || self.bar_width == 0 {
            return Err(Error::Config(format!(
                "display width and bar width must be > 0, got {} / {}",
                self.display_width, self.bar_width
            )));
        }
        if self.bar_count() == 0 {
            return Err(Error::Config(format!(
                "bar width {} exceeds display width {}",
                self.bar_width, self.display_width
            )));
        }
        if self.freqs_per_bar() == 0 {
            return Err(Error::Config(format!(
                "{} bars need more than {} FFT bins",
                self.bar_count(),
                self.fft_size / 2
            )));
        }
        if !self.compression.is_finite() || self.compression <= 0.0 {
            return Err(Error::Config(format!(
                "compression must be finite and > 0, got {}",
                self.compression
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binning() {
        let config = SpectrumConfig::default();
        config.validate().unwrap();

        // 800 px / 8 px = 100 bars over 1024 bins
        assert_eq!(config.bar_count(), 100);
        assert_eq!(config.freqs_per_bar(), 10);
    }

    #[test]
    fn test_hz_to_bar() {
        let config = SpectrumConfig::default();

        // 44100 / 2048 ≈ 21.5 Hz per bin, 215 Hz per bar
        assert_eq!(config.hz_to_bin(440.0, 44100), 20);
        assert_eq!(config.hz_to_bar(440.0, 44100), Some(2));
        assert_eq!(config.hz_to_bar(22050.0, 44100), None);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let config = SpectrumConfig {
            fft_size: 1000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_bars() {
        let config = SpectrumConfig {
            bar_width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SpectrumConfig {
            bar_width: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_too_many_bars_for_fft() {
        // 800 bars cannot share 32 bins
        let config = SpectrumConfig {
            fft_size: 64,
            bar_width: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
