//! Project data model for pulsetracker.
//!
//! This crate defines the read-only value graph the playback engine
//! consumes: decoded samples, instruments, patterns of note rows, and the
//! song that arranges patterns across tracks. Nothing here changes over
//! time; edits happen on a clone that is swapped in wholesale.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod instrument;
mod pattern;
mod project;
mod sample;
mod song;

pub use error::ProjectError;
pub use instrument::{Instrument, InstrumentId};
pub use pattern::{Note, Pattern, PatternId, Row, DEFAULT_PATTERN_LENGTH};
pub use project::{DanglingRef, Project, DEFAULT_BPM, DEFAULT_TRACK_COUNT, MAX_BPM, MAX_TRACKS};
pub use sample::SampleBuffer;
pub use song::SongRow;
