//! Playback sink backed by the default cpal output device.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, info, warn};

use super::sink::PlaybackSink;
use crate::error::{Error, Result};

/// Output stream fed from a bounded sample queue
///
/// The device callback is the only consumer; `write` is the only producer.
/// The sink reports ready once at most one refill chunk is still queued,
/// which double-buffers the device like a two-period stream.
pub struct CpalSink {
    /// Interleaved samples waiting for the device (shared with callback)
    queue: Arc<Mutex<VecDeque<f32>>>,

    /// Queue length (samples) at or below which another chunk is accepted
    ready_threshold: usize,

    playing: bool,

    /// Audio output stream (kept alive)
    stream: cpal::Stream,
}

impl CpalSink {
    /// Open the default output device at the track's rate and channel count
    pub fn open(sample_rate: u32, channels: u16, chunk_frames: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioDevice("No audio output device found".to_string()))?;

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let ready_threshold = chunk_frames * channels as usize;
        let queue = Arc::new(Mutex::new(VecDeque::with_capacity(ready_threshold * 2)));
        let queue_callback = Arc::clone(&queue);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut queue = queue_callback
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    // Underrun plays silence
                    for out in data.iter_mut() {
                        *out = queue.pop_front().unwrap_or(0.0);
                    }
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| Error::AudioDevice(format!("Failed to build audio stream: {}", e)))?;

        // Some backends start streams on creation
        if let Err(e) = stream.pause() {
            debug!("Audio stream cannot pause on creation: {}", e);
        }

        Ok(Self {
            queue,
            ready_threshold,
            playing: false,
            stream,
        })
    }

    /// True once the device has consumed everything written
    pub fn is_drained(&self) -> bool {
        self.queued() == 0
    }

    fn queued(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PlaybackSink for CpalSink {
    fn is_ready(&self) -> bool {
        self.queued() <= self.ready_threshold
    }

    fn write(&mut self, samples: &[f32]) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(samples.iter().copied());
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        match self.stream.play() {
            Ok(()) => self.playing = true,
            Err(e) => warn!("Failed to start audio stream: {}", e),
        }
    }

    /// Pause the device and discard up to two chunks of queued audio
    ///
    /// Playing again resumes exactly at the cursor, so the discarded audio is
    /// never heard. End of track goes through `finish` instead.
    fn stop(&mut self) {
        if let Err(e) = self.stream.pause() {
            warn!("Failed to pause audio stream: {}", e);
        }
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.playing = false;
    }

    /// Keep the stream running so the queued tail plays out, then underruns to silence
    fn finish(&mut self) {
        self.playing = false;
    }
}
