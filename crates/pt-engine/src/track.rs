//! Playback channel for one track slot.

use pt_ir::{Note, Project, Row};

use crate::frame::StereoFrame;
use crate::pitch::PitchMapping;

/// Per-track playback cursor.
///
/// A track remembers the note it is playing (a copy; instrument and
/// sample data are resolved through the project on every frame) and
/// steps through the instrument's sample at a fractional rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Track slot this channel plays
    index: usize,
    /// Note currently sounding
    active: Option<Note>,
    /// Fractional read position in the sample
    position: f64,
    /// Position advance per output frame
    increment: f64,
    /// Set when a one-shot sample runs out
    stopped: bool,
}

impl Track {
    /// Create an idle track for slot `index`.
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            active: None,
            position: 0.0,
            increment: 1.0,
            stopped: true,
        }
    }

    /// Track slot index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The note currently held, if any.
    pub fn active_note(&self) -> Option<&Note> {
        self.active.as_ref()
    }

    /// Current read position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Position advance per frame.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Returns true if the last one-shot sample ran out (or nothing was triggered).
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Play a row. Rows without a note leave the track untouched.
    pub fn trigger(&mut self, row: &Row, mapping: PitchMapping) {
        if let Some(note) = row.note {
            self.trigger_note(note, mapping);
        }
    }

    /// Start a note from the beginning of its sample.
    pub fn trigger_note(&mut self, note: Note, mapping: PitchMapping) {
        self.active = Some(note);
        self.position = 0.0;
        self.stopped = false;
        self.increment = mapping.increment(note.pitch);
    }

    /// Silence the track and forget its note.
    pub fn reset(&mut self) {
        self.active = None;
        self.position = 0.0;
        self.increment = 1.0;
        self.stopped = true;
    }

    /// Produce the next frame, or None if the track is silent.
    ///
    /// Silent means: no note, stopped, or the note's instrument or sample
    /// missing from `project`. When the read position passes the end of the
    /// sample a looped instrument wraps to the start; a one-shot stops and
    /// this call returns None.
    pub fn next_sample(&mut self, project: &Project) -> Option<StereoFrame> {
        if self.stopped {
            return None;
        }
        let note = self.active?;
        let instrument = project.instrument(note.instrument?)?;
        let sample = instrument.sample.as_ref()?;

        if self.position as usize >= sample.len() {
            self.position = 0.0;
            if !instrument.looped {
                self.stopped = true;
                return None;
            }
        }

        let index = self.position as usize;
        // Float rounding at the tail can land one past the data.
        let (left, right) = sample.frame(index).unwrap_or((0.0, 0.0));
        self.position += self.increment;

        Some(StereoFrame::new(left, right).scaled(note.volume))
    }
}
