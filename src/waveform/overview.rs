//! Min/max column overview for the scrub display.

use std::path::Path;

use super::Waveform;
use crate::error::{Error, Result};

/// Extremes of one pixel column, clamped against zero
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnPeak {
    pub min: f32,
    pub max: f32,
}

/// Downsampled waveform: exactly one `ColumnPeak` per display column
#[derive(Clone, Debug, Default)]
pub struct WaveformImage {
    columns: Vec<ColumnPeak>,
}

impl WaveformImage {
    /// Downsample channel 0 of `waveform` into `width` columns
    ///
    /// Column `x` covers frames `[fpp*x, fpp*(x+1))` with `fpp = frame_count / width`.
    /// When the track has fewer frames than columns every column still reads
    /// at least one frame, so the column count never depends on track length.
    pub fn build(waveform: &Waveform, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::Config("overview width must be > 0".to_string()));
        }

        let frame_count = waveform.frame_count();
        let frames_per_pixel = frame_count as f64 / width as f64;

        let columns = (0..width)
            .map(|x| {
                let start = ((frames_per_pixel * x as f64) as usize).min(frame_count - 1);
                let end = ((frames_per_pixel * (x + 1) as f64) as usize)
                    .max(start + 1)
                    .min(frame_count);

                // Starting both extremes at 0 keeps silence a flat line
                let mut peak = ColumnPeak::default();
                for frame in start..end {
                    let sample = waveform.first_channel(frame);
                    peak.min = peak.min.min(sample);
                    peak.max = peak.max.max(sample);
                }
                peak
            })
            .collect();

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnPeak] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Rasterize into RGBA8 pixels: white column spans on black, centered vertically
    pub fn render_rgba(&self, height: u32) -> Vec<u8> {
        let width = self.columns.len();
        let mut pixels = vec![0u8; width * height as usize * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        if height == 0 {
            return pixels;
        }

        let half = (height as f32 - 1.0) / 2.0;
        let scale = half * 0.98;
        for (x, column) in self.columns.iter().enumerate() {
            let top = (half - column.max * scale).round().clamp(0.0, height as f32 - 1.0) as usize;
            let bottom = (half - column.min * scale).round().clamp(0.0, height as f32 - 1.0) as usize;
            for y in top..=bottom {
                let offset = (y * width + x) * 4;
                pixels[offset..offset + 3].copy_from_slice(&[245, 245, 245]);
            }
        }
        pixels
    }

    /// Save the overview as a PNG of `width() x height` pixels
    pub fn save_png(&self, path: impl AsRef<Path>, height: u32) -> Result<()> {
        let pixels = self.render_rgba(height);
        image::save_buffer(
            path.as_ref(),
            &pixels,
            self.columns.len() as u32,
            height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}
