//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use wavescope::params::{playback_constants::TARGET_FPS, VisualizerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavescope", version)]
#[command(about = "Waveform player with a live spectrum display", long_about = None)]
pub struct Args {
    /// Set the verbosity for logging
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a WAV file on the default output device
    Play {
        file: PathBuf,

        /// Stop at end of track instead of looping
        #[arg(long)]
        no_loop: bool,

        /// Quit after this many seconds of wall time
        #[arg(long, value_name = "SECONDS")]
        seconds: Option<f32>,

        /// Start position (0.0 - 1.0)
        #[arg(long, value_name = "POSITION", default_value = "0")]
        start: f32,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Run playback into a WAV file instead of a device
    Record {
        file: PathBuf,

        /// Output WAV path
        #[arg(long, value_name = "PATH")]
        out: PathBuf,

        /// Amount of audio to record
        #[arg(long, value_name = "SECONDS", default_value = "10")]
        seconds: f32,

        /// Stop at end of track instead of looping
        #[arg(long)]
        no_loop: bool,
    },

    /// Write the waveform overview as a PNG
    Overview {
        file: PathBuf,

        /// Output PNG path
        #[arg(long, value_name = "PATH")]
        out: PathBuf,

        /// Image width (pixels, one column per pixel)
        #[arg(long, default_value = "800")]
        width: usize,

        /// Image height (pixels)
        #[arg(long, default_value = "128")]
        height: u32,
    },

    /// Print the spectrum bars of a single window
    Analyze {
        file: PathBuf,

        /// Window start time
        #[arg(long, value_name = "SECONDS", default_value = "0")]
        at: f64,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

/// Spectrum display geometry
#[derive(clap::Args, Debug, Clone)]
pub struct DisplayArgs {
    /// Spectrum display width (pixels)
    #[arg(long, default_value = "800")]
    pub display_width: usize,

    /// Width of a single bar (pixels)
    #[arg(long, default_value = "8")]
    pub bar_width: usize,

    /// FFT window size (power of 2)
    #[arg(long, default_value = "2048")]
    pub fft_size: usize,

    /// Output frames per second
    #[arg(long, default_value_t = TARGET_FPS)]
    pub fps: u32,
}

impl DisplayArgs {
    /// Apply display overrides on top of the default configuration
    pub fn config(&self) -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.spectrum.display_width = self.display_width;
        config.spectrum.bar_width = self.bar_width;
        config.spectrum.fft_size = self.fft_size;
        config
    }
}

/// Logging verbosity
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}
