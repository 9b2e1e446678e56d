//! Wavescope library - waveform playback with a live spectrum display
//!
//! Streams a decoded waveform into a playback sink in lockstep with the
//! device, and derives per-frame frequency bars, falling peak markers and a
//! min/max overview image for scrubbing.

pub mod analysis;
pub mod error;
pub mod params;
pub mod playback;
pub mod session;
pub mod waveform;

pub use error::{Error, Result};
pub use session::Session;
