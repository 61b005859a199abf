//! The complete musical document.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::error::ProjectError;
use crate::instrument::{Instrument, InstrumentId};
use crate::pattern::{Pattern, PatternId, DEFAULT_PATTERN_LENGTH};
use crate::song::SongRow;

/// Upper bound on tracks; the engine preallocates this many channels.
pub const MAX_TRACKS: usize = 32;

/// Default number of tracks in a new project.
pub const DEFAULT_TRACK_COUNT: usize = 8;

/// Default tempo in BPM.
pub const DEFAULT_BPM: f32 = 138.0;

/// Fastest tempo a project may declare.
pub const MAX_BPM: f32 = 1000.0;

/// Instruments, patterns and the song that arranges them.
///
/// Once handed to the engine a project is never mutated; edits go to a
/// clone which is swapped in whole.
#[derive(Clone, Debug)]
pub struct Project {
    /// Project title
    pub name: ArrayString<32>,
    /// Instruments by id
    pub instruments: BTreeMap<InstrumentId, Instrument>,
    /// Patterns by id
    pub patterns: BTreeMap<PatternId, Pattern>,
    /// Song rows in playback order
    pub song: Vec<SongRow>,
    /// Number of tracks (playback channels)
    pub track_count: usize,
    /// Tempo in BPM (a beat is four rows)
    pub bpm: f32,
    /// Row length for song rows created with `add_song_row`
    pub default_row_length: u16,
}

impl Default for Project {
    fn default() -> Self {
        let mut name = ArrayString::new();
        let _ = name.try_push_str("Untitled");
        Self {
            name,
            instruments: BTreeMap::new(),
            patterns: BTreeMap::new(),
            song: Vec::new(),
            track_count: DEFAULT_TRACK_COUNT,
            bpm: DEFAULT_BPM,
            default_row_length: DEFAULT_PATTERN_LENGTH as u16,
        }
    }
}

/// A reference the engine will treat as empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DanglingRef {
    /// A song row names a pattern that does not exist
    Pattern {
        song_row: usize,
        track: usize,
        id: PatternId,
    },
    /// A note names an instrument that does not exist
    Instrument {
        pattern: PatternId,
        row: usize,
        id: InstrumentId,
    },
}

impl Project {
    /// Create an empty project.
    pub fn new(name: &str) -> Self {
        let mut project = Self::default();
        project.name.clear();
        for ch in name.chars() {
            if project.name.try_push(ch).is_err() {
                break;
            }
        }
        project
    }

    /// Add or replace an instrument.
    pub fn add_instrument(&mut self, instrument: Instrument) {
        self.instruments.insert(instrument.id, instrument);
    }

    /// Add or replace a pattern.
    pub fn add_pattern(&mut self, pattern: Pattern) {
        self.patterns.insert(pattern.id, pattern);
    }

    /// Append an all-empty song row and return its index.
    pub fn add_song_row(&mut self) -> usize {
        self.song.push(SongRow::new(self.track_count, self.default_row_length));
        self.song.len() - 1
    }

    /// Append a song row from a track mapping and return its index.
    ///
    /// The row length is the longest referenced pattern, or
    /// `default_row_length` if no referenced pattern exists.
    pub fn push_song_row(&mut self, patterns: &[Option<PatternId>]) -> usize {
        let longest = patterns
            .iter()
            .flatten()
            .filter_map(|id| self.patterns.get(id))
            .map(|p| p.len())
            .max()
            .filter(|&len| len > 0)
            .map(|len| len.min(u16::MAX as usize) as u16)
            .unwrap_or(self.default_row_length);
        self.song.push(SongRow::from_patterns(patterns, longest));
        self.song.len() - 1
    }

    /// Look up an instrument.
    #[inline]
    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.get(&id)
    }

    /// Look up a pattern.
    #[inline]
    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(&id)
    }

    /// Get a song row.
    #[inline]
    pub fn song_row(&self, index: usize) -> Option<&SongRow> {
        self.song.get(index)
    }

    /// Check the structure once, before the project reaches the audio thread.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 || self.bpm > MAX_BPM {
            return Err(ProjectError::InvalidTempo(self.bpm));
        }
        if self.track_count == 0 || self.track_count > MAX_TRACKS {
            return Err(ProjectError::InvalidTrackCount {
                count: self.track_count,
                max: MAX_TRACKS,
            });
        }
        for (i, row) in self.song.iter().enumerate() {
            if row.width() != self.track_count {
                return Err(ProjectError::SongRowWidth {
                    song_row: i,
                    found: row.width(),
                    expected: self.track_count,
                });
            }
            if row.length == 0 {
                return Err(ProjectError::EmptySongRow { song_row: i });
            }
        }
        Ok(())
    }

    /// List references that will play as silence.
    pub fn dangling_references(&self) -> Vec<DanglingRef> {
        let mut dangling = Vec::new();
        for (song_row, row) in self.song.iter().enumerate() {
            for (track, id) in row.patterns.iter().enumerate() {
                if let Some(id) = *id {
                    if !self.patterns.contains_key(&id) {
                        dangling.push(DanglingRef::Pattern { song_row, track, id });
                    }
                }
            }
        }
        for pattern in self.patterns.values() {
            for (row, cell) in pattern.rows().iter().enumerate() {
                let Some(id) = cell.note.and_then(|n| n.instrument) else {
                    continue;
                };
                if !self.instruments.contains_key(&id) {
                    dangling.push(DanglingRef::Instrument {
                        pattern: pattern.id,
                        row,
                        id,
                    });
                }
            }
        }
        dangling
    }
}
