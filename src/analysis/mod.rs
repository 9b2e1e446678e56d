//! Spectrum analysis and peak animation.
//!
//! The analyzer turns a Hann-windowed FFT of the samples at the playback
//! cursor into normalized frequency bars; the peak animator keeps a falling
//! marker above each bar.

mod peaks;
mod spectrum;

// Re-export public types
pub use peaks::PeakAnimator;
pub use spectrum::{hann_window, SpectrumAnalyzer};
