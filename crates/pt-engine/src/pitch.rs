//! Note-to-playback-rate conversion.
//!
//! A track steps through its sample by a fractional increment per output
//! frame; 1.0 plays the sample at its stored speed.

/// The note that plays a sample at its stored speed.
pub const REFERENCE_PITCH: u8 = 60;

/// How a note's pitch becomes a sample increment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PitchMapping {
    /// `pitch / 60`: proportional to the note number, so octaves are not
    /// doublings. Matches existing projects.
    #[default]
    Linear,
    /// 12-TET: `2^((pitch - 60) / 12)`.
    EqualTempered,
}

impl PitchMapping {
    /// Sample increment for a note.
    pub fn increment(self, pitch: u8) -> f64 {
        match self {
            PitchMapping::Linear => pitch as f64 / REFERENCE_PITCH as f64,
            PitchMapping::EqualTempered => {
                let semitones = pitch as f64 - REFERENCE_PITCH as f64;
                libm::pow(2.0, semitones / 12.0)
            }
        }
    }
}
