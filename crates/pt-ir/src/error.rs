//! Load-time validation errors.

/// Structural problems that make a project unsafe to hand to the engine.
///
/// These are detected once, before a project reaches the real-time path.
/// Dangling references are not errors; they play as silence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectError {
    /// Left and right channel data differ in length
    #[error("sample channels differ in length (left {left}, right {right})")]
    ChannelLengthMismatch { left: usize, right: usize },
    /// Interleaved data cannot be split into whole frames
    #[error("interleaved sample data of {len} values is not divisible into {channels} channels")]
    RaggedInterleave { len: usize, channels: u16 },
    /// Sample data claims zero channels
    #[error("sample data has no channels")]
    NoChannels,
    /// Tempo is not a number, not positive, or above `MAX_BPM`
    #[error("invalid tempo {0} BPM")]
    InvalidTempo(f32),
    /// Track count outside 1..=MAX_TRACKS
    #[error("track count {count} outside 1..={max}")]
    InvalidTrackCount { count: usize, max: usize },
    /// A song row maps a different number of tracks than the project has
    #[error("song row {song_row} maps {found} tracks, project has {expected}")]
    SongRowWidth {
        song_row: usize,
        found: usize,
        expected: usize,
    },
    /// A song row would wrap before playing any row
    #[error("song row {song_row} has zero length")]
    EmptySongRow { song_row: usize },
}
