//! WAV decoding into a normalized f32 waveform.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::info;

use super::Waveform;
use crate::error::Result;

/// Decode a WAV file into interleaved f32 samples in [-1, 1]
///
/// Integer formats (8/16/24/32 bit) are scaled by their full-scale value,
/// float files are taken as-is.
pub fn read_wav(path: impl AsRef<Path>) -> Result<Waveform> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<hound::Result<Vec<_>>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<hound::Result<Vec<_>>>()?
        }
    };

    let waveform = Waveform::new(spec.sample_rate, spec.channels, samples)?;
    info!(
        "Audio file loaded: {} ({} ch @ {}Hz, {:.1}s)",
        path.display(),
        waveform.channels(),
        waveform.sample_rate(),
        waveform.duration().as_secs_f32()
    );
    Ok(waveform)
}
