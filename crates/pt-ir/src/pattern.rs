//! Notes, rows and patterns.

use alloc::vec::Vec;
use arrayvec::ArrayString;
use core::fmt::Write;

use crate::instrument::InstrumentId;

/// Identifier of a pattern within a project.
pub type PatternId = u16;

/// Default number of rows in a new pattern.
pub const DEFAULT_PATTERN_LENGTH: usize = 16;

const NOTE_NAMES: [&str; 12] = [
    "C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-",
];

/// A triggerable event: pitch, instrument and volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    /// MIDI-like note number (0-127, 60 = C-4)
    pub pitch: u8,
    /// Instrument to play (None plays silence)
    pub instrument: Option<InstrumentId>,
    /// Volume (0.0-1.0 by convention, not enforced)
    pub volume: f32,
}

impl Note {
    /// Create a note.
    pub const fn new(pitch: u8, instrument: Option<InstrumentId>, volume: f32) -> Self {
        Self { pitch, instrument, volume }
    }

    /// Octave number, with C-4 = 60.
    pub const fn octave(&self) -> i8 {
        (self.pitch / 12) as i8 - 1
    }

    /// Note name such as `C-4` or `D#5`.
    pub fn name(&self) -> ArrayString<4> {
        let mut s = ArrayString::new();
        let _ = write!(s, "{}{}", NOTE_NAMES[(self.pitch % 12) as usize], self.octave());
        s
    }

    /// Volume as two hex digits (0.0-1.0 maps to 00-7f).
    pub fn volume_hex(&self) -> ArrayString<8> {
        let mut s = ArrayString::new();
        let scaled = (self.volume * 127.0) as i32;
        let _ = write!(s, "{:02x}", scaled.max(0));
        s
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new(60, None, 1.0)
    }
}

/// One step within a pattern, holding at most one note.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Row {
    pub note: Option<Note>,
}

impl Row {
    /// An empty row.
    pub const fn empty() -> Self {
        Self { note: None }
    }

    /// A row holding `note`.
    pub const fn with_note(note: Note) -> Self {
        Self { note: Some(note) }
    }
}

/// A fixed-length ordered sequence of rows.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Unique id within the project
    pub id: PatternId,
    /// Display name
    pub name: ArrayString<32>,
    /// Rows in playback order; the length never changes during playback
    rows: Vec<Row>,
}

impl Pattern {
    /// Create a pattern of `length` empty rows.
    ///
    /// An empty name becomes `Pattern {id}`.
    pub fn new(id: PatternId, length: usize, name: &str) -> Self {
        let mut pattern_name = ArrayString::new();
        if name.is_empty() {
            let _ = write!(pattern_name, "Pattern {}", id);
        } else {
            for ch in name.chars() {
                if pattern_name.try_push(ch).is_err() {
                    break;
                }
            }
        }
        Self {
            id,
            name: pattern_name,
            rows: alloc::vec![Row::empty(); length],
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the pattern has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row, or None past the end.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Get a mutable row, or None past the end.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Place a note on a row. Returns false if the row is out of range.
    pub fn set_note(&mut self, index: usize, note: Option<Note>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.note = note;
                true
            }
            None => false,
        }
    }

    /// Number of rows that carry a note.
    pub fn note_count(&self) -> usize {
        self.rows.iter().filter(|r| r.note.is_some()).count()
    }
}
