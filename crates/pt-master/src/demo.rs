//! A small built-in song with synthesised instruments.
//!
//! Used by the CLI when no project is supplied and by tests that need
//! something realistic to play.

use pt_ir::{Instrument, Note, Pattern, PatternId, Project, SampleBuffer};
use std::f32::consts::TAU;

/// Sample rate the demo instruments are synthesised at.
pub const DEMO_SAMPLE_RATE: u32 = 48000;

pub const KICK: u16 = 0x01;
pub const HAT: u16 = 0x02;
pub const BASS: u16 = 0x03;
pub const LEAD: u16 = 0x04;

const KICK_PATTERN: PatternId = 0;
const HAT_PATTERN: PatternId = 1;
const BASS_PATTERN: PatternId = 2;
const LEAD_PATTERN: PatternId = 3;
const LEAD_ANSWER: PatternId = 4;
const FILL_PATTERN: PatternId = 5;

fn seconds(secs: f32) -> usize {
    (DEMO_SAMPLE_RATE as f32 * secs) as usize
}

/// Sine with a falling pitch and exponential decay.
fn kick() -> Vec<f32> {
    let len = seconds(0.35);
    let mut phase = 0.0f32;
    (0..len)
        .map(|i| {
            let t = i as f32 / DEMO_SAMPLE_RATE as f32;
            let freq = 45.0 + 110.0 * (-t * 30.0).exp();
            phase += TAU * freq / DEMO_SAMPLE_RATE as f32;
            phase.sin() * (-t * 9.0).exp() * 0.9
        })
        .collect()
}

/// Short burst of deterministic noise.
fn hat() -> Vec<f32> {
    let len = seconds(0.06);
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|i| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = state as f32 / u32::MAX as f32 * 2.0 - 1.0;
            let t = i as f32 / len as f32;
            noise * (1.0 - t) * (1.0 - t) * 0.35
        })
        .collect()
}

/// Whole cycles of a sawtooth, for looping.
fn saw(period: usize, cycles: usize, level: f32) -> Vec<f32> {
    (0..period * cycles)
        .map(|i| ((i % period) as f32 / period as f32 * 2.0 - 1.0) * level)
        .collect()
}

/// Whole cycles of a square wave, for looping.
fn square(period: usize, cycles: usize, level: f32) -> Vec<f32> {
    (0..period * cycles)
        .map(|i| if i % period < period / 2 { level } else { -level })
        .collect()
}

/// Row, pitch, instrument, volume.
type Step = (usize, u8, u16, f32);

fn pattern(id: PatternId, name: &str, notes: &[Step]) -> Pattern {
    let mut pattern = Pattern::new(id, 16, name);
    for &(row, pitch, instrument, volume) in notes {
        pattern.set_note(row, Some(Note::new(pitch, Some(instrument), volume)));
    }
    pattern
}

/// An eight-track, four-song-row loop at the default tempo.
pub fn demo_project() -> Project {
    let mut project = Project::new("Demo");

    project.add_instrument(Instrument::new(KICK, SampleBuffer::mono(kick(), DEMO_SAMPLE_RATE)).named("kick"));
    project.add_instrument(Instrument::new(HAT, SampleBuffer::mono(hat(), DEMO_SAMPLE_RATE)).named("hat"));
    project.add_instrument(
        Instrument::new(BASS, SampleBuffer::mono(saw(400, 8, 0.4), DEMO_SAMPLE_RATE))
            .named("bass")
            .looped(true),
    );
    project.add_instrument(
        Instrument::new(LEAD, SampleBuffer::mono(square(200, 16, 0.15), DEMO_SAMPLE_RATE))
            .named("lead")
            .looped(true),
    );

    let four_on_floor: Vec<Step> = (0..16).step_by(4).map(|row| (row, 60, KICK, 1.0)).collect();
    project.add_pattern(pattern(KICK_PATTERN, "Kick", &four_on_floor));

    let offbeats: Vec<Step> = (2..16).step_by(4).map(|row| (row, 60, HAT, 0.8)).collect();
    project.add_pattern(pattern(HAT_PATTERN, "Hats", &offbeats));

    project.add_pattern(pattern(
        BASS_PATTERN,
        "Bass",
        &[(0, 48, BASS, 0.9), (3, 48, BASS, 0.7), (6, 55, BASS, 0.8), (8, 51, BASS, 0.9), (12, 53, BASS, 0.8)],
    ));
    project.add_pattern(pattern(
        LEAD_PATTERN,
        "Lead",
        &[(0, 72, LEAD, 0.7), (4, 75, LEAD, 0.6), (8, 79, LEAD, 0.7), (12, 77, LEAD, 0.5)],
    ));
    project.add_pattern(pattern(
        LEAD_ANSWER,
        "Lead answer",
        &[(0, 79, LEAD, 0.7), (6, 77, LEAD, 0.6), (10, 75, LEAD, 0.6), (14, 72, LEAD, 0.5)],
    ));
    project.add_pattern(pattern(
        FILL_PATTERN,
        "Kick fill",
        &[(0, 60, KICK, 1.0), (4, 60, KICK, 1.0), (8, 60, KICK, 1.0), (10, 60, KICK, 0.7), (12, 60, KICK, 1.0), (14, 60, KICK, 0.8), (15, 62, KICK, 0.6)],
    ));

    let rows: [[Option<PatternId>; 4]; 4] = [
        [Some(KICK_PATTERN), Some(HAT_PATTERN), Some(BASS_PATTERN), None],
        [Some(KICK_PATTERN), Some(HAT_PATTERN), Some(BASS_PATTERN), Some(LEAD_PATTERN)],
        [Some(KICK_PATTERN), Some(HAT_PATTERN), Some(BASS_PATTERN), Some(LEAD_ANSWER)],
        [Some(FILL_PATTERN), Some(HAT_PATTERN), Some(BASS_PATTERN), Some(LEAD_PATTERN)],
    ];
    for row in rows {
        let mut mapping = vec![None; project.track_count];
        mapping[..row.len()].copy_from_slice(&row);
        project.push_song_row(&mapping);
    }

    project
}
