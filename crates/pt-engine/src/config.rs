//! Engine configuration.

use crate::pitch::PitchMapping;

/// Default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Default tick resolution.
pub const DEFAULT_TICKS_PER_ROW: u8 = 6;

/// Constants that stay fixed for a playback session.
///
/// Tempo lives on the project; everything here belongs to the output
/// device or to the engine's timing resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Ticks per row (at least 1)
    pub ticks_per_row: u8,
    /// Pitch to playback-rate mapping
    pub pitch_mapping: PitchMapping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            ticks_per_row: DEFAULT_TICKS_PER_ROW,
            pitch_mapping: PitchMapping::Linear,
        }
    }
}

impl EngineConfig {
    /// Default configuration at the given sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Self::default().with_sample_rate(sample_rate)
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate.max(1);
        self
    }

    pub fn with_ticks_per_row(mut self, ticks_per_row: u8) -> Self {
        self.ticks_per_row = ticks_per_row.max(1);
        self
    }

    pub fn with_pitch_mapping(mut self, pitch_mapping: PitchMapping) -> Self {
        self.pitch_mapping = pitch_mapping;
        self
    }
}
