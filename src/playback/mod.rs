//! Playback position, seeking and sink feeding.

mod cursor;
mod device;
mod feeder;
pub mod seek;
mod sink;

// Re-export public types
pub use cursor::{Advance, PlaybackCursor};
pub use device::CpalSink;
pub use feeder::{Refill, StreamFeeder};
pub use sink::{MemorySink, PlaybackSink, WavSink};

/// Transport state of the loaded track
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}
