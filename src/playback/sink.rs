//! Playback sink abstraction and the non-device sinks.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::warn;

use crate::error::Result;

/// Destination for interleaved sample chunks
///
/// The sink's consumer (a device callback, a file, a test) drains written
/// audio at its own pace. Producers must poll `is_ready` and never write
/// while it reports false.
pub trait PlaybackSink {
    /// True when the sink can accept another refill chunk
    fn is_ready(&self) -> bool;

    /// Append interleaved samples (whole frames only)
    fn write(&mut self, samples: &[f32]);

    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn stop(&mut self);

    /// End of track: stop accepting audio but let already written audio play out
    fn finish(&mut self) {
        self.stop();
    }
}

/// In-memory sink recording every write
#[derive(Debug)]
pub struct MemorySink {
    written: Vec<f32>,
    write_sizes: Vec<usize>,
    ready: bool,
    playing: bool,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    /// Always-ready, stopped sink
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            write_sizes: Vec::new(),
            ready: true,
            playing: false,
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// All samples written so far, in order
    pub fn written(&self) -> &[f32] {
        &self.written
    }

    /// Sample count of each individual write
    pub fn write_sizes(&self) -> &[usize] {
        &self.write_sizes
    }

    pub fn clear(&mut self) {
        self.written.clear();
        self.write_sizes.clear();
    }
}

impl PlaybackSink for MemorySink {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn write(&mut self, samples: &[f32]) {
        self.written.extend_from_slice(samples);
        self.write_sizes.push(samples.len());
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }
}

/// Sink writing played audio to a 32-bit float WAV file
///
/// Ready until a write fails: the file absorbs audio as fast as the frame loop
/// produces it. A failed write stops the sink and is reported by `finalize`.
pub struct WavSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    error: Option<hound::Error>,
    frames_written: usize,
    channels: u16,
    playing: bool,
}

impl WavSink {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32, channels: u16) -> Result<Self> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(path, spec)?;
        Ok(Self {
            writer: Some(writer),
            error: None,
            frames_written: 0,
            channels,
            playing: false,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// True once a write has failed
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Flush the header and close the file, returning the first write error if any
    pub fn finalize(mut self) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

impl PlaybackSink for WavSink {
    fn is_ready(&self) -> bool {
        self.writer.is_some()
    }

    fn write(&mut self, samples: &[f32]) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        for &sample in samples {
            if let Err(e) = writer.write_sample(sample) {
                warn!("WAV write failed, stopping recording: {}", e);
                self.writer = None;
                self.error = Some(e);
                self.playing = false;
                return;
            }
        }
        self.frames_written += samples.len() / self.channels as usize;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_writes() {
        let mut sink = MemorySink::new();
        assert!(sink.is_ready());
        assert!(!sink.is_playing());

        sink.write(&[0.1, 0.2]);
        sink.write(&[0.3]);
        assert_eq!(sink.written(), &[0.1, 0.2, 0.3]);
        assert_eq!(sink.write_sizes(), &[2, 1]);

        sink.clear();
        assert!(sink.written().is_empty());
    }

    #[test]
    fn test_wav_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let mut sink = WavSink::create(&path, 8000, 2).unwrap();
        sink.play();
        sink.write(&[0.5, -0.5, 0.25, -0.25]);
        assert_eq!(sink.frames_written(), 2);
        sink.finalize().unwrap();

        let waveform = crate::waveform::read_wav(&path).unwrap();
        assert_eq!(waveform.channels(), 2);
        assert_eq!(waveform.samples(), &[0.5, -0.5, 0.25, -0.25]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_wav_sink_write_failure_stops_and_reports() {
        let mut sink = WavSink::create("/dev/full", 44100, 1).unwrap();
        sink.play();

        // Large enough to overflow the writer's buffer into the full device
        sink.write(&[0.1; 16_384]);

        assert!(sink.has_failed());
        assert!(!sink.is_playing());
        assert!(!sink.is_ready());
        assert_eq!(sink.frames_written(), 0);
        assert!(matches!(sink.finalize(), Err(crate::error::Error::Wav(_))));
    }
}
