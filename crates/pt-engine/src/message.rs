//! Transport commands in, position events out.

use alloc::sync::Arc;
use alloc::vec::Vec;
use pt_ir::Project;

/// A request from the control side to the engine.
#[derive(Clone, Debug)]
pub enum Command {
    /// Replace the project and reset playback to the top of the song
    LoadProject(Arc<Project>),
    /// Replace the project but keep the playback position (edits while playing)
    SwapProject(Arc<Project>),
    /// Start playback from the beginning of the current song row
    Play,
    /// Stop playback
    Stop,
    /// Jump to a song row
    Seek { song_row: usize },
}

/// A position change reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A new row started playing
    RowChanged { row: usize },
    /// Playback entered a song row
    SongRowChanged { song_row: usize },
}

/// Where the engine posts events.
///
/// Called from the audio thread, so implementations must not block. A
/// full sink returns false and the event is dropped.
pub trait EventSink {
    fn emit(&mut self, event: EngineEvent) -> bool;
}

impl EventSink for Vec<EngineEvent> {
    fn emit(&mut self, event: EngineEvent) -> bool {
        self.push(event);
        true
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: EngineEvent) -> bool {
        (**self).emit(event)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: EngineEvent) -> bool {
        true
    }
}
