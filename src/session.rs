//! Playback session: the loaded track plus everything derived from it.
//!
//! A session owns the waveform, its cursor, the sink feeding the device and
//! the per-frame visualization state. Call [`Session::update`] once per
//! output frame; all other methods are user commands and may be called in
//! any state, including with nothing loaded.

use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use crate::analysis::{PeakAnimator, SpectrumAnalyzer};
use crate::error::Result;
use crate::params::VisualizerConfig;
use crate::playback::{seek, PlaybackCursor, PlaybackSink, PlaybackState, Refill, StreamFeeder};
use crate::waveform::{read_wav, Waveform, WaveformImage};

/// A loaded track
///
/// Fields drop in declaration order: the sink is released before the buffer
/// it was fed from.
struct Track<S> {
    sink: S,
    cursor: PlaybackCursor,
    overview: WaveformImage,
    waveform: Waveform,
}

/// Owner of the loaded track and the visualization state
pub struct Session<S: PlaybackSink> {
    feeder: StreamFeeder,
    analyzer: SpectrumAnalyzer,
    peaks: PeakAnimator,
    track: Option<Track<S>>,
    looping: bool,
    autoplay: bool,
    overview_width: usize,
}

impl<S: PlaybackSink> Session<S> {
    /// Create an empty session; fails on invalid configuration
    pub fn new(config: &VisualizerConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = SpectrumAnalyzer::new(&config.spectrum)?;
        let peaks = PeakAnimator::new(analyzer.bar_count(), config.playback.gravity);

        Ok(Self {
            feeder: StreamFeeder::new(config.playback.chunk_frames),
            analyzer,
            peaks,
            track: None,
            looping: config.playback.looping,
            autoplay: config.playback.autoplay,
            overview_width: config.playback.overview_width,
        })
    }

    /// Replace the current track with `waveform` played through `sink`
    ///
    /// The new track is fully prepared before the old one is unloaded.
    pub fn load(&mut self, waveform: Waveform, sink: S) -> Result<()> {
        let overview = WaveformImage::build(&waveform, self.overview_width)?;
        let track = Track {
            sink,
            cursor: PlaybackCursor::new(waveform.frame_count()),
            overview,
            waveform,
        };

        if self.track.is_some() {
            info!("Unloading previous file.");
        }
        self.unload();

        info!(
            "Loaded track: {} frames, {} ch @ {}Hz",
            track.waveform.frame_count(),
            track.waveform.channels(),
            track.waveform.sample_rate()
        );
        self.track = Some(track);
        if self.autoplay {
            self.play();
        }
        Ok(())
    }

    /// Decode a WAV file and load it, opening its sink with `open_sink`
    ///
    /// Decoding or sink errors are returned before anything is replaced, so
    /// the current track keeps playing.
    pub fn open_file<F>(&mut self, path: impl AsRef<Path>, open_sink: F) -> Result<()>
    where
        F: FnOnce(&Waveform) -> Result<S>,
    {
        let waveform = read_wav(path)?;
        let sink = open_sink(&waveform)?;
        self.load(waveform, sink)
    }

    /// Stop the sink, then release the track and clear the visualization
    pub fn unload(&mut self) {
        drop(self.eject());
    }

    /// Unload the track and hand back its stopped sink
    ///
    /// Lets the caller finish a sink that reports errors on close, such as a
    /// recording file.
    pub fn eject(&mut self) -> Option<S> {
        let sink = self.track.take().map(|mut track| {
            track.sink.stop();
            let Track { sink, .. } = track;
            info!("Unloaded track");
            sink
        });
        self.analyzer.clear();
        self.peaks.reset();
        sink
    }

    pub fn is_loaded(&self) -> bool {
        self.track.is_some()
    }

    pub fn state(&self) -> PlaybackState {
        match &self.track {
            Some(track) if track.sink.is_playing() => PlaybackState::Playing,
            _ => PlaybackState::Stopped,
        }
    }

    pub fn play(&mut self) {
        if let Some(track) = self.track.as_mut() {
            if !track.sink.is_playing() {
                track.sink.play();
                info!("Play from frame {}", track.cursor.frame());
            }
        }
    }

    /// Stop the sink, keeping the cursor
    pub fn pause(&mut self) {
        if let Some(track) = self.track.as_mut() {
            track.sink.stop();
            info!("Paused at frame {}", track.cursor.frame());
        }
    }

    /// Stop the sink and rewind to the start
    pub fn stop(&mut self) {
        if let Some(track) = self.track.as_mut() {
            track.sink.stop();
            track.cursor.reset();
            info!("Stopped");
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn toggle_loop(&mut self) -> bool {
        self.looping = !self.looping;
        debug!("Loop {}", if self.looping { "on" } else { "off" });
        self.looping
    }

    /// Jump to a normalized position (clamped to the track)
    pub fn seek(&mut self, position: f32) {
        if let Some(track) = self.track.as_mut() {
            let frame = seek::position_to_frame(position, track.waveform.frame_count());
            track.cursor.set(frame);
            debug!("Seek to {:.3} -> frame {}", position, frame);
        }
    }

    /// Move by a signed number of seconds (clamped to the track)
    pub fn skip(&mut self, delta_secs: f64) {
        if let Some(track) = self.track.as_mut() {
            let frame = seek::offset_frame(
                track.cursor.frame(),
                delta_secs,
                track.waveform.sample_rate(),
                track.waveform.frame_count(),
            );
            track.cursor.set(frame);
            debug!("Skip {:+}s -> frame {}", delta_secs, frame);
        }
    }

    /// Run one output frame: analyze at the cursor, refill the sink, animate peaks
    ///
    /// While stopped the bars stay frozen and the peaks settle onto them.
    pub fn update(&mut self, dt: Duration) -> Refill {
        let mut refill = Refill::Skipped;
        if let Some(track) = self.track.as_mut() {
            if track.sink.is_playing() {
                self.analyzer
                    .analyze(&track.waveform, track.cursor.frame());
                refill = self.feeder.refill(
                    &track.waveform,
                    &mut track.cursor,
                    &mut track.sink,
                    self.looping,
                );
            }
        }
        self.peaks.update(self.analyzer.bars(), dt.as_secs_f32());
        refill
    }

    /// Current bar values in [0, 1]
    pub fn bars(&self) -> &[f32] {
        self.analyzer.bars()
    }

    /// Current peak marker heights, parallel to `bars()`
    pub fn peaks(&self) -> &[f32] {
        self.peaks.peaks()
    }

    pub fn waveform(&self) -> Option<&Waveform> {
        self.track.as_ref().map(|t| &t.waveform)
    }

    pub fn overview(&self) -> Option<&WaveformImage> {
        self.track.as_ref().map(|t| &t.overview)
    }

    pub fn sink(&self) -> Option<&S> {
        self.track.as_ref().map(|t| &t.sink)
    }

    /// Cursor frame, 0 when nothing is loaded
    pub fn position(&self) -> usize {
        self.track.as_ref().map_or(0, |t| t.cursor.frame())
    }

    /// Cursor as a fraction of the track, for the scrub marker
    pub fn progress(&self) -> f32 {
        self.track.as_ref().map_or(0.0, |t| t.cursor.progress())
    }

    /// Time at the cursor
    pub fn elapsed(&self) -> Duration {
        self.track.as_ref().map_or(Duration::ZERO, |t| {
            Duration::from_secs_f64(t.cursor.frame() as f64 / t.waveform.sample_rate() as f64)
        })
    }
}

impl<S: PlaybackSink> Drop for Session<S> {
    fn drop(&mut self) {
        self.unload();
    }
}
