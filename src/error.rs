//! Error types for loading, configuring and playing waveforms.

/// Errors surfaced by the visualizer core and its adapters
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// WAV file could not be read or written (missing file, bad header, unsupported format)
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Decoded audio violates the waveform invariants
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(String),

    /// Invalid configuration constant
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Audio output device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Overview image could not be written
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
