//! pulsetracker CLI: plays the demo song or renders it to WAV.
//!
//! Usage:
//!   cargo run --bin pt-cli
//!   cargo run --bin pt-cli -- --wav demo.wav --seconds 20

use anyhow::{Context, Result};
use clap::Parser;
use pt_master::{demo, Controller, EngineConfig, PitchMapping};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

#[derive(Parser)]
#[command(name = "pt-cli", about = "Play or render the pulsetracker demo song")]
struct Cli {
    /// Render offline to this WAV file instead of playing
    #[arg(long)]
    wav: Option<PathBuf>,

    /// How long to play or render
    #[arg(long, default_value_t = 16.0)]
    seconds: f32,

    /// Override the song tempo
    #[arg(long)]
    bpm: Option<f32>,

    /// Use equal-tempered pitch instead of the linear mapping
    #[arg(long)]
    tempered: bool,

    /// Ticks per row
    #[arg(long, default_value_t = 6)]
    ticks_per_row: u8,

    /// Sample rate for WAV rendering
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mapping = if cli.tempered {
        PitchMapping::EqualTempered
    } else {
        PitchMapping::Linear
    };
    let config = EngineConfig::default()
        .with_ticks_per_row(cli.ticks_per_row)
        .with_pitch_mapping(mapping);

    let mut project = demo::demo_project();
    if let Some(bpm) = cli.bpm {
        project.bpm = bpm;
    }

    let mut ctrl = Controller::with_config(config);
    ctrl.load_project(project).context("demo project rejected")?;

    let p = ctrl.project();
    println!("Title:      {}", p.name);
    println!("Tracks:     {}", p.track_count);
    println!("Song rows:  {}", p.song.len());
    println!("Patterns:   {}", p.patterns.len());
    println!("Tempo:      {} BPM, {} ticks/row", p.bpm, ctrl.config().ticks_per_row);
    println!();

    match cli.wav {
        Some(path) => render_to_wav(&ctrl, &path, cli.sample_rate, cli.seconds),
        None => play_audio(&mut ctrl, cli.seconds),
    }
}

fn play_audio(ctrl: &mut Controller, seconds: f32) -> Result<()> {
    let sample_rate = ctrl.start_audio().context("failed to open audio output")?;
    ctrl.play()?;
    println!("Playing at {} Hz...", sample_rate);
    println!();

    let deadline = Instant::now() + Duration::from_secs_f32(seconds.max(0.0).min(86_400.0));
    while Instant::now() < deadline {
        if ctrl.poll() > 0 {
            let pos = ctrl.position();
            print!("\rSong: {:02X} | Row: {:02X}", pos.song_row, pos.row);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    ctrl.stop()?;
    ctrl.stop_audio();
    println!("\rDone.                ");
    Ok(())
}

fn render_to_wav(ctrl: &Controller, path: &Path, sample_rate: u32, seconds: f32) -> Result<()> {
    println!("Rendering {}s to {} at {} Hz...", seconds, path.display(), sample_rate);
    ctrl.render_to_wav(path, sample_rate, seconds)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Done.");
    Ok(())
}
