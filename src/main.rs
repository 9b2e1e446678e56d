//! Wavescope - waveform player with a live spectrum display
//!
//! Headless front end: decodes a WAV file, drives the playback session at a
//! fixed frame rate and prints the spectrum to the terminal.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use cli::{Args, Command, DisplayArgs};
use wavescope::analysis::SpectrumAnalyzer;
use wavescope::params::{playback_constants::TARGET_FPS, VisualizerConfig};
use wavescope::playback::{seek, CpalSink, PlaybackState, Refill, WavSink};
use wavescope::waveform::{read_wav, WaveformImage};
use wavescope::{Error, Result, Session};

/// Bar glyphs from empty to full
const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let result = match args.command {
        Command::Play {
            file,
            no_loop,
            seconds,
            start,
            display,
        } => play(&file, !no_loop, seconds, start, &display),
        Command::Record {
            file,
            out,
            seconds,
            no_loop,
        } => record(&file, &out, seconds, !no_loop),
        Command::Overview {
            file,
            out,
            width,
            height,
        } => overview(&file, &out, width, height),
        Command::Analyze { file, at, display } => analyze(&file, at, &display),
    };

    if let Err(e) = result {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("Exiting.");
    ExitCode::SUCCESS
}

/// Real-time playback on the default device
fn play(
    file: &Path,
    looping: bool,
    seconds: Option<f32>,
    start: f32,
    display: &DisplayArgs,
) -> Result<()> {
    let mut config = display.config();
    config.playback.looping = looping;
    let chunk_frames = config.playback.chunk_frames;

    let mut session = Session::new(&config)?;
    session.open_file(file, |waveform| {
        CpalSink::open(waveform.sample_rate(), waveform.channels(), chunk_frames)
    })?;
    session.seek(start);
    if session.state() != PlaybackState::Playing {
        session.unload();
        return Err(Error::AudioDevice("Audio stream did not start".to_string()));
    }

    let fps = display.fps.max(1);
    let frame_time = Duration::from_secs_f64(1.0 / fps as f64);
    let total = session
        .waveform()
        .map_or(Duration::ZERO, |w| w.duration());
    let deadline = seconds.map(|s| Duration::from_secs_f32(s.max(0.0)));

    let started = Instant::now();
    let mut last = started;
    let mut frame: u64 = 0;
    loop {
        thread::sleep(frame_time);
        let now = Instant::now();
        let refill = session.update(now - last);
        last = now;
        frame += 1;

        // ~10 display lines per second
        if frame % (fps as u64 / 10).max(1) == 0 {
            println!(
                "{:>6.1}s / {:.1}s |{}|",
                session.elapsed().as_secs_f32(),
                total.as_secs_f32(),
                spectrum_line(session.bars(), session.peaks())
            );
        }

        if matches!(refill, Refill::Ended { .. }) {
            info!("End of track");
            // The tail is still queued; pausing now would cut it
            let drain_limit = Instant::now() + Duration::from_secs(1);
            while session.sink().is_some_and(|s| !s.is_drained())
                && Instant::now() < drain_limit
            {
                thread::sleep(frame_time);
            }
            break;
        }
        if deadline.is_some_and(|d| now - started >= d) {
            break;
        }
    }

    session.unload();
    Ok(())
}

/// Offline playback into a WAV file
fn record(file: &Path, out: &Path, seconds: f32, looping: bool) -> Result<()> {
    let mut config = VisualizerConfig::default();
    config.playback.looping = looping;

    let waveform = read_wav(file)?;
    let target_frames = (seconds.max(0.0) * waveform.sample_rate() as f32) as usize;
    let sink = WavSink::create(out, waveform.sample_rate(), waveform.channels())?;

    let mut session = Session::new(&config)?;
    session.load(waveform, sink)?;

    let frame_time = Duration::from_secs_f64(1.0 / TARGET_FPS as f64);
    while session.state() == PlaybackState::Playing
        && session.sink().map_or(0, |s| s.frames_written()) < target_frames
    {
        session.update(frame_time);
    }

    // A failed write stops the sink; finalize reports it
    let mut written = 0;
    if let Some(sink) = session.eject() {
        written = sink.frames_written();
        sink.finalize()?;
    }
    println!("Recorded {} frames to {}", written, out.display());
    Ok(())
}

fn overview(file: &Path, out: &Path, width: usize, height: u32) -> Result<()> {
    let waveform = read_wav(file)?;
    WaveformImage::build(&waveform, width)?.save_png(out, height)?;
    println!("Wrote {}x{} overview to {}", width, height, out.display());
    Ok(())
}

/// Print one spectrum window as a table
fn analyze(file: &Path, at: f64, display: &DisplayArgs) -> Result<()> {
    let config = display.config();
    let waveform = read_wav(file)?;
    let mut analyzer = SpectrumAnalyzer::new(&config.spectrum)?;

    let start = seek::offset_frame(0, at, waveform.sample_rate(), waveform.frame_count());
    let bars = analyzer.analyze(&waveform, start);

    let hz_per_bin = waveform.sample_rate() as f32 / config.spectrum.fft_size as f32;
    let per_bar = config.spectrum.freqs_per_bar();
    for (i, value) in bars.iter().enumerate() {
        let low = (i * per_bar) as f32 * hz_per_bin;
        let high = ((i + 1) * per_bar) as f32 * hz_per_bin;
        println!(
            "{:>4} {:>8.0}-{:<8.0}Hz {:.3} {}",
            i,
            low,
            high,
            value,
            "#".repeat((value * 40.0).round() as usize)
        );
    }
    Ok(())
}

/// One character per bar; a dot marks a peak well above its bar
fn spectrum_line(bars: &[f32], peaks: &[f32]) -> String {
    let level = |v: f32| ((v.clamp(0.0, 1.0) * 8.0).round() as usize).min(8);
    bars.iter()
        .zip(peaks)
        .map(|(&bar, &peak)| {
            let bar_level = level(bar);
            if level(peak) >= bar_level + 2 {
                '·'
            } else {
                LEVELS[bar_level]
            }
        })
        .collect()
}
