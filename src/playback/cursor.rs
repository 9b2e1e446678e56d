//! Current playback position.

/// Frame index into the loaded waveform, always `< frame_count`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackCursor {
    frame: usize,
    frame_count: usize,
}

/// Result of moving the cursor forward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Cursor moved and is still inside the track
    Within,
    /// Cursor reached the end of the track and was reset to 0
    Wrapped,
}

impl PlaybackCursor {
    /// Cursor at frame 0 of a track with `frame_count` frames (> 0)
    pub fn new(frame_count: usize) -> Self {
        debug_assert!(frame_count > 0);
        Self {
            frame: 0,
            frame_count,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Frames left before the end of the track
    pub fn remaining(&self) -> usize {
        self.frame_count - self.frame
    }

    /// Jump to `frame`, clamped to the last frame
    pub fn set(&mut self, frame: usize) {
        self.frame = frame.min(self.frame_count - 1);
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Move forward by `frames` (at most `remaining()`), wrapping to 0 at the end
    pub fn advance(&mut self, frames: usize) -> Advance {
        debug_assert!(frames <= self.remaining());
        self.frame += frames;
        if self.frame >= self.frame_count {
            self.frame = 0;
            Advance::Wrapped
        } else {
            Advance::Within
        }
    }

    /// Position as a fraction of the track in [0, 1)
    pub fn progress(&self) -> f32 {
        self.frame as f32 / self.frame_count as f32
    }
}
