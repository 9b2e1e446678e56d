//! Windowed FFT analysis and bar binning.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::Result;
use crate::params::SpectrumConfig;
use crate::waveform::Waveform;

/// Frequency-bar analyzer over channel 0 of a waveform
///
/// All buffers are allocated once at construction; `analyze` only reuses them.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    /// Precomputed Hann coefficients
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Magnitudes of the first N/2 bins
    magnitudes: Vec<f32>,
    bars: Vec<f32>,
    freqs_per_bar: usize,
    compression: f32,
}

impl SpectrumAnalyzer {
    pub fn new(config: &SpectrumConfig) -> Result<Self> {
        config.validate()?;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            fft,
            window: (0..config.fft_size)
                .map(|i| hann_window(i, config.fft_size))
                .collect(),
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            scratch,
            magnitudes: vec![0.0; config.fft_size / 2],
            bars: vec![0.0; config.bar_count()],
            freqs_per_bar: config.freqs_per_bar(),
            compression: config.compression,
        })
    }

    /// FFT window size
    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Latest bar values, each in [0, 1]
    pub fn bars(&self) -> &[f32] {
        &self.bars
    }

    /// Latest magnitude spectrum (N/2 bins)
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Zero all bars (nothing loaded)
    pub fn clear(&mut self) {
        self.bars.fill(0.0);
        self.magnitudes.fill(0.0);
    }

    /// Analyze N frames starting at `start_frame`, wrapping past the end of the track
    pub fn analyze(&mut self, waveform: &Waveform, start_frame: usize) -> &[f32] {
        let frame_count = waveform.frame_count();
        let start = start_frame % frame_count;

        // Apply Hann window
        for (i, (slot, w)) in self.buffer.iter_mut().zip(&self.window).enumerate() {
            let sample = waveform.first_channel((start + i) % frame_count);
            *slot = Complex::new(sample * w, 0.0);
        }

        // Perform FFT
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (magnitude, bin) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *magnitude = bin.norm();
        }

        self.bin_magnitudes();
        &self.bars
    }

    /// Compress magnitudes against the frame maximum and average them per bar
    fn bin_magnitudes(&mut self) {
        let max_magnitude = self.magnitudes.iter().copied().fold(0.0f32, f32::max);
        let reference = (max_magnitude * self.compression).ln_1p();

        // Silent frame: log(1 + 0) / log(1 + 0) is undefined, show nothing
        if !(reference.is_finite() && reference > 0.0) {
            self.bars.fill(0.0);
            return;
        }

        let per_bar = self.freqs_per_bar;
        for (bar, bins) in self
            .bars
            .iter_mut()
            .zip(self.magnitudes.chunks_exact(per_bar))
        {
            let sum: f32 = bins
                .iter()
                .map(|m| ((m * self.compression).ln_1p() / reference).clamp(0.0, 1.0))
                .sum();
            *bar = sum / per_bar as f32;
        }
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SpectrumAnalyzer {
        SpectrumAnalyzer::new(&SpectrumConfig::default()).unwrap()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_sizes_follow_config() {
        let analyzer = analyzer();
        assert_eq!(analyzer.fft_size(), 2048);
        assert_eq!(analyzer.magnitudes().len(), 1024);
        assert_eq!(analyzer.bar_count(), 100);
    }

    #[test]
    fn test_sine_peaks_in_its_bar() {
        let config = SpectrumConfig::default();
        let waveform = Waveform::sine(440.0, 44100, 1.0).unwrap();
        let mut analyzer = SpectrumAnalyzer::new(&config).unwrap();

        let bars = analyzer.analyze(&waveform, 0).to_vec();
        let tone_bar = config.hz_to_bar(440.0, 44100).unwrap();

        for (i, &value) in bars.iter().enumerate() {
            if i.abs_diff(tone_bar) >= 5 {
                assert!(
                    bars[tone_bar] > value,
                    "bar {} ({}) >= tone bar {} ({})",
                    i,
                    value,
                    tone_bar,
                    bars[tone_bar]
                );
            }
        }
        assert!(bars[tone_bar] > 0.3);
    }

    #[test]
    fn test_silence_is_zero() {
        let waveform = Waveform::new(44100, 2, vec![0.0; 20_000]).unwrap();
        let mut analyzer = analyzer();

        let bars = analyzer.analyze(&waveform, 0);
        assert!(bars.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_bars_in_unit_range() {
        // Deterministic pseudo-noise
        let mut state = 0x2545_f491u32;
        let samples: Vec<f32> = (0..8192)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();
        let waveform = Waveform::new(44100, 1, samples).unwrap();
        let mut analyzer = analyzer();

        for start in [0, 3000, 8000] {
            let bars = analyzer.analyze(&waveform, start);
            assert!(bars.iter().all(|b| b.is_finite() && (0.0..=1.0).contains(b)));
        }
    }

    #[test]
    fn test_window_wraps_near_end() {
        let config = SpectrumConfig::default();
        let tone = Waveform::sine(1000.0, 44100, 0.5).unwrap();
        let frame_count = tone.frame_count();

        // Rotated copy: what the wrapped window should see from frame 0
        let start = frame_count - 100;
        let mut rotated = tone.samples()[start..].to_vec();
        rotated.extend_from_slice(&tone.samples()[..start]);
        let rotated = Waveform::new(44100, 1, rotated).unwrap();

        let mut a = SpectrumAnalyzer::new(&config).unwrap();
        let mut b = SpectrumAnalyzer::new(&config).unwrap();
        assert_eq!(a.analyze(&tone, start), b.analyze(&rotated, 0));
    }

    #[test]
    fn test_track_shorter_than_window() {
        let waveform = Waveform::sine(440.0, 44100, 0.01).unwrap();
        let mut analyzer = analyzer();
        assert!(waveform.frame_count() < analyzer.fft_size());

        let bars = analyzer.analyze(&waveform, 400);
        assert_eq!(bars.len(), 100);
        assert!(bars.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn test_clear_zeroes_bars() {
        let waveform = Waveform::sine(440.0, 44100, 0.1).unwrap();
        let mut analyzer = analyzer();
        analyzer.analyze(&waveform, 0);
        analyzer.clear();
        assert!(analyzer.bars().iter().all(|&b| b == 0.0));
    }
}
