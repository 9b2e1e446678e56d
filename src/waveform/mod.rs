//! Decoded waveform storage and derived overview images.

mod overview;
mod wav;

use std::time::Duration;

use crate::error::{Error, Result};

pub use overview::{ColumnPeak, WaveformImage};
pub use wav::read_wav;

/// Decoded audio asset: interleaved f32 samples normalized to [-1, 1]
///
/// Immutable once constructed. `frame_count * channels == samples.len()`
/// and `frame_count > 0` are checked up front so downstream division by the
/// frame count is always safe.
#[derive(Debug, Clone)]
pub struct Waveform {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl Waveform {
    /// Wrap an interleaved sample buffer, rejecting empty or ragged input
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidWaveform("sample rate must be > 0".to_string()));
        }
        if channels == 0 {
            return Err(Error::InvalidWaveform("channel count must be > 0".to_string()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(Error::InvalidWaveform(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channels
            )));
        }
        if samples.is_empty() {
            return Err(Error::InvalidWaveform("waveform has no frames".to_string()));
        }

        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Mono sine wave, handy for tests and demos
    pub fn sine(frequency_hz: f32, sample_rate: u32, duration_secs: f32) -> Result<Self> {
        let frames = (sample_rate as f32 * duration_secs) as usize;
        let step = std::f32::consts::TAU * frequency_hz / sample_rate as f32;
        let samples = (0..frames).map(|i| (i as f32 * step).sin()).collect();
        Self::new(sample_rate, 1, samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Full interleaved buffer
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Interleaved samples of frames `[start, end)`
    pub fn frames(&self, start: usize, end: usize) -> &[f32] {
        let ch = self.channels as usize;
        &self.samples[start * ch..end * ch]
    }

    /// Channel-0 sample of a frame
    #[inline]
    pub fn first_channel(&self, frame: usize) -> f32 {
        self.samples[frame * self.channels as usize]
    }

    /// Track length
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_matches_channels() {
        let waveform = Waveform::new(48000, 2, vec![0.0; 960]).unwrap();
        assert_eq!(waveform.frame_count(), 480);
        assert_eq!(waveform.duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_first_channel_skips_other_channels() {
        let waveform = Waveform::new(8000, 2, vec![0.1, -0.9, 0.2, -0.8, 0.3, -0.7]).unwrap();
        assert_eq!(waveform.first_channel(0), 0.1);
        assert_eq!(waveform.first_channel(2), 0.3);
        assert_eq!(waveform.frames(1, 2), &[0.2, -0.8]);
    }

    #[test]
    fn test_rejects_invalid_buffers() {
        assert!(matches!(
            Waveform::new(44100, 1, Vec::new()),
            Err(Error::InvalidWaveform(_))
        ));
        assert!(Waveform::new(0, 1, vec![0.0]).is_err());
        assert!(Waveform::new(44100, 0, vec![0.0]).is_err());
        assert!(Waveform::new(44100, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_sine_length() {
        let waveform = Waveform::sine(440.0, 44100, 1.0).unwrap();
        assert_eq!(waveform.frame_count(), 44100);
        assert_eq!(waveform.channels(), 1);
        assert!(waveform.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
