//! Refilling the playback sink from the waveform at the cursor.

use log::{debug, trace};

use super::cursor::{Advance, PlaybackCursor};
use super::sink::PlaybackSink;
use crate::waveform::Waveform;

/// Outcome of one refill attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refill {
    /// Sink was stopped or not ready; nothing written
    Skipped,
    /// A full chunk was written, crossing the end of the track `wraps` times
    Written { frames: usize, wraps: usize },
    /// Track ended with looping off: `frames` written, sink finished, cursor at 0
    Ended { frames: usize },
}

/// Writes fixed-size chunks of the waveform to a sink, starting at the cursor
#[derive(Debug, Clone)]
pub struct StreamFeeder {
    chunk_frames: usize,
}

impl StreamFeeder {
    pub fn new(chunk_frames: usize) -> Self {
        debug_assert!(chunk_frames > 0);
        Self { chunk_frames }
    }

    pub fn chunk_frames(&self) -> usize {
        self.chunk_frames
    }

    /// Poll the sink once and, if it wants data, write one chunk
    ///
    /// The chunk is split at the end of the track: with `looping` the rest is
    /// taken from frame 0, otherwise the sink is finished (already written
    /// audio still plays out) and nothing more is written. `remaining` strictly decreases every iteration because the
    /// cursor is always inside the track, so each span is at least one frame.
    pub fn refill<S: PlaybackSink>(
        &self,
        waveform: &Waveform,
        cursor: &mut PlaybackCursor,
        sink: &mut S,
        looping: bool,
    ) -> Refill {
        if !sink.is_playing() || !sink.is_ready() {
            return Refill::Skipped;
        }

        let mut remaining = self.chunk_frames;
        let mut wraps = 0;
        while remaining > 0 {
            let start = cursor.frame();
            let span = remaining.min(cursor.remaining());
            sink.write(waveform.frames(start, start + span));
            remaining -= span;
            trace!("Wrote frames {}..{}", start, start + span);

            if cursor.advance(span) == Advance::Wrapped {
                if !looping {
                    debug!("End of track, stopping");
                    sink.finish();
                    return Refill::Ended {
                        frames: self.chunk_frames - remaining,
                    };
                }
                debug!("End of track, looping to start");
                wraps += 1;
            }
        }

        Refill::Written {
            frames: self.chunk_frames,
            wraps,
        }
    }
}
