//! Song arrangement.

use alloc::vec;
use alloc::vec::Vec;

use crate::pattern::PatternId;

/// One step of the arrangement: which pattern each track plays.
///
/// `length` is the number of rows played before the song advances. It is
/// stored per song row rather than read from one of the referenced
/// patterns, so tracks may reference patterns of different lengths. A
/// pattern shorter than `length` simply stops triggering (its last note
/// sustains); a longer one is cut off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongRow {
    /// Pattern per track (index = track), None = empty
    pub patterns: Vec<Option<PatternId>>,
    /// Rows played before advancing to the next song row
    pub length: u16,
}

impl SongRow {
    /// An all-empty song row for `track_count` tracks.
    pub fn new(track_count: usize, length: u16) -> Self {
        Self {
            patterns: vec![None; track_count],
            length,
        }
    }

    /// Build a song row from a track mapping.
    pub fn from_patterns(patterns: &[Option<PatternId>], length: u16) -> Self {
        Self {
            patterns: patterns.to_vec(),
            length,
        }
    }

    /// Pattern assigned to `track`, or None if empty or out of range.
    #[inline]
    pub fn pattern_for(&self, track: usize) -> Option<PatternId> {
        self.patterns.get(track).copied().flatten()
    }

    /// Assign a pattern to a track. Returns false if the track is out of range.
    pub fn set_pattern(&mut self, track: usize, pattern: Option<PatternId>) -> bool {
        match self.patterns.get_mut(track) {
            Some(slot) => {
                *slot = pattern;
                true
            }
            None => false,
        }
    }

    /// Number of track slots.
    pub fn width(&self) -> usize {
        self.patterns.len()
    }
}
