//! Playback engine for pulsetracker.
//!
//! Walks the song row by row in step with the sample clock, triggers notes
//! on per-track playback channels and mixes them into stereo blocks. The
//! render path neither allocates nor blocks; position changes go out
//! through an [`EventSink`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod clock;
mod config;
mod engine;
mod frame;
mod message;
mod pitch;
mod state;
mod track;

pub use clock::{TickClock, ROWS_PER_BEAT};
pub use config::{EngineConfig, DEFAULT_SAMPLE_RATE, DEFAULT_TICKS_PER_ROW};
pub use engine::Engine;
pub use frame::StereoFrame;
pub use message::{Command, EngineEvent, EventSink, NullSink};
pub use pitch::{PitchMapping, REFERENCE_PITCH};
pub use state::{EngineState, PlaybackPosition};
pub use track::Track;
