//! Transport state: clock, row cursor and tracks.

use heapless::Vec as HVec;
use pt_ir::{Project, MAX_TRACKS};

use crate::clock::TickClock;
use crate::config::EngineConfig;
use crate::frame::StereoFrame;
use crate::message::{EngineEvent, EventSink};
use crate::track::Track;

/// Where playback is within the song.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackPosition {
    pub song_row: usize,
    pub row: usize,
}

/// Mutable playback state for one session.
///
/// Everything that changes over time lives here; the project is passed in
/// by reference on each call. Tracks are stored inline so loading a
/// project never allocates.
#[derive(Clone, Debug)]
pub struct EngineState {
    config: EngineConfig,
    clock: TickClock,
    /// Tempo the clock was built for
    bpm: f32,
    /// Tick within the current row
    tick: u8,
    /// Row within the current song row; None before the first advance
    row: Option<usize>,
    song_row: usize,
    playing: bool,
    tracks: HVec<Track, MAX_TRACKS>,
    dropped_events: u64,
}

impl EngineState {
    /// Stopped state with no tracks.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: TickClock::new(config.sample_rate, pt_ir::DEFAULT_BPM, config.ticks_per_row),
            bpm: pt_ir::DEFAULT_BPM,
            tick: 0,
            row: None,
            song_row: 0,
            playing: false,
            tracks: HVec::new(),
            dropped_events: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current tick within the row.
    pub fn tick(&self) -> u8 {
        self.tick
    }

    pub fn position(&self) -> PlaybackPosition {
        PlaybackPosition {
            song_row: self.song_row,
            row: self.row.unwrap_or(0),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Events the sink refused since this state was created.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Set up for a freshly loaded project: new tracks, counters at zero, stopped.
    pub fn reset(&mut self, project: Option<&Project>) {
        self.playing = false;
        self.tick = 0;
        self.row = None;
        self.song_row = 0;
        self.tracks.clear();
        if let Some(project) = project {
            self.resize_tracks(project.track_count);
            self.set_tempo(project.bpm);
        }
        self.clock.reset();
    }

    /// Adopt an edited project without losing the playback position.
    ///
    /// Existing tracks keep playing; added tracks start idle, removed ones
    /// are dropped. The song row is clamped to the new song.
    pub fn retarget(&mut self, project: &Project) {
        self.resize_tracks(project.track_count);
        if project.bpm != self.bpm {
            self.set_tempo(project.bpm);
        }
        let len = project.song.len();
        if len == 0 {
            self.song_row = 0;
            self.row = None;
        } else if self.song_row >= len {
            self.song_row = len - 1;
        }
    }

    fn resize_tracks(&mut self, track_count: usize) {
        let count = track_count.min(MAX_TRACKS);
        self.tracks.truncate(count);
        for index in self.tracks.len()..count {
            // Capacity is MAX_TRACKS and count <= MAX_TRACKS.
            let _ = self.tracks.push(Track::new(index));
        }
    }

    fn set_tempo(&mut self, bpm: f32) {
        self.bpm = bpm;
        self.clock = TickClock::new(self.config.sample_rate, bpm, self.config.ticks_per_row);
    }

    /// Start playing from row 0 of the current song row.
    ///
    /// The first row is triggered immediately, before any audio is rendered.
    pub fn play(&mut self, project: Option<&Project>, sink: &mut impl EventSink) {
        self.playing = true;
        self.tick = 0;
        self.row = None;
        self.clock.reset();
        if let Some(project) = project {
            self.advance_row(project, sink);
        }
    }

    /// Stop playing and silence every track. Counters are kept.
    ///
    /// Sustained notes are forgotten: after `play` a track stays silent
    /// until its pattern triggers a new note.
    pub fn stop(&mut self) {
        self.playing = false;
        for track in self.tracks.iter_mut() {
            track.reset();
        }
    }

    /// Move to the start of `song_row` (wrapped to the song length).
    pub fn seek(&mut self, project: Option<&Project>, song_row: usize, sink: &mut impl EventSink) {
        let len = project.map_or(0, |p| p.song.len());
        self.song_row = if len == 0 { 0 } else { song_row % len };
        self.row = None;
        self.tick = 0;
        self.clock.reset();
        if self.playing {
            if let Some(project) = project {
                self.advance_row(project, sink);
            }
        }
    }

    /// Step to the next row and trigger it on every track.
    ///
    /// Past the end of a song row the cursor moves to row 0 of the next
    /// song row, wrapping to the top of the song. Emits `RowChanged`, then
    /// `SongRowChanged` when a song row is entered. Does nothing for an
    /// empty song.
    pub fn advance_row(&mut self, project: &Project, sink: &mut impl EventSink) {
        let len = project.song.len();
        if len == 0 {
            return;
        }

        let current = self.song_row % len;
        let (song_row, row, entered) = match self.row {
            None => (current, 0, true),
            Some(row) => {
                let length = project.song[current].length.max(1) as usize;
                if row + 1 >= length {
                    ((current + 1) % len, 0, true)
                } else {
                    (current, row + 1, false)
                }
            }
        };
        self.song_row = song_row;
        self.row = Some(row);

        let mapping = project.song[song_row].patterns.as_slice();
        for track in self.tracks.iter_mut() {
            let cell = mapping
                .get(track.index())
                .copied()
                .flatten()
                .and_then(|id| project.pattern(id))
                .and_then(|pattern| pattern.row(row));
            if let Some(cell) = cell {
                track.trigger(cell, self.config.pitch_mapping);
            }
        }

        self.post(sink, EngineEvent::RowChanged { row });
        if entered {
            self.post(sink, EngineEvent::SongRowChanged { song_row });
        }
    }

    fn post(&mut self, sink: &mut impl EventSink, event: EngineEvent) {
        if !sink.emit(event) {
            self.dropped_events += 1;
        }
    }

    /// Mix one block into `left` and `right`.
    ///
    /// Output is added to whatever the buffers hold; the caller zeroes
    /// them. Stopped, without a project, or with an empty song the buffers
    /// are left untouched. Renders `min(left.len(), right.len())` frames.
    pub fn render_block(
        &mut self,
        project: Option<&Project>,
        left: &mut [f32],
        right: &mut [f32],
        sink: &mut impl EventSink,
    ) {
        if !self.playing {
            return;
        }
        let Some(project) = project else {
            return;
        };
        if project.song.is_empty() {
            return;
        }

        let ticks_per_row = self.config.ticks_per_row.max(1);
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mut frame = StereoFrame::silence();
            for track in self.tracks.iter_mut() {
                if let Some(out) = track.next_sample(project) {
                    frame.mix(out);
                }
            }
            *l += frame.left;
            *r += frame.right;

            if self.clock.advance() {
                self.tick += 1;
                if self.tick >= ticks_per_row {
                    self.tick = 0;
                    self.advance_row(project, sink);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::NullSink;
    use crate::pitch::PitchMapping;
    use alloc::vec;
    use alloc::vec::Vec;
    use pt_ir::{Instrument, Note, Pattern, SampleBuffer};

    const RATE: u32 = 4800;

    fn config() -> EngineConfig {
        EngineConfig::new(RATE)
    }

    /// Two tracks, four song rows of four rows each, at 120 BPM.
    fn project() -> Project {
        let mut project = Project::new("state");
        project.track_count = 2;
        project.bpm = 120.0;
        project.add_instrument(Instrument::new(1, SampleBuffer::mono(vec![0.5; 64], RATE)).looped(true));

        let mut pattern = Pattern::new(0, 4, "");
        pattern.set_note(0, Some(Note::new(60, Some(1), 1.0)));
        project.add_pattern(pattern);
        for _ in 0..4 {
            project.push_song_row(&[Some(0), None]);
        }
        project
    }

    #[test]
    fn reset_builds_one_track_per_slot() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        assert_eq!(state.tracks().len(), 2);
        assert_eq!(state.track(1).map(Track::index), Some(1));
        assert!(!state.is_playing());
    }

    #[test]
    fn track_count_is_capped() {
        let mut project = project();
        project.track_count = MAX_TRACKS + 8;
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        assert_eq!(state.tracks().len(), MAX_TRACKS);
    }

    #[test]
    fn play_triggers_first_row() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));

        let mut events: Vec<EngineEvent> = Vec::new();
        state.play(Some(&project), &mut events);
        assert!(state.is_playing());
        assert_eq!(
            events,
            vec![
                EngineEvent::RowChanged { row: 0 },
                EngineEvent::SongRowChanged { song_row: 0 },
            ]
        );
        assert!(state.track(0).and_then(Track::active_note).is_some());
        assert!(state.track(1).and_then(Track::active_note).is_none());
    }

    #[test]
    fn row_advances_every_six_ticks() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        let mut events: Vec<EngineEvent> = Vec::new();
        state.play(Some(&project), &mut events);
        events.clear();

        let mut left = [0.0; 599];
        let mut right = [0.0; 599];
        state.render_block(Some(&project), &mut left, &mut right, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.tick(), 5);

        let mut left = [0.0; 1];
        let mut right = [0.0; 1];
        state.render_block(Some(&project), &mut left, &mut right, &mut events);
        assert_eq!(events, vec![EngineEvent::RowChanged { row: 1 }]);
        assert_eq!(state.position(), PlaybackPosition { song_row: 0, row: 1 });
    }

    #[test]
    fn song_wraps_to_first_row() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        state.play(Some(&project), &mut NullSink);

        let mut events: Vec<EngineEvent> = Vec::new();
        // 4 song rows * 4 rows, advance past the last one
        for _ in 0..16 {
            state.advance_row(&project, &mut events);
        }
        assert_eq!(state.position(), PlaybackPosition { song_row: 0, row: 0 });
        assert_eq!(
            &events[events.len() - 2..],
            &[
                EngineEvent::RowChanged { row: 0 },
                EngineEvent::SongRowChanged { song_row: 0 },
            ]
        );
        let song_changes = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::SongRowChanged { .. }))
            .count();
        assert_eq!(song_changes, 4);
    }

    #[test]
    fn stop_silences_but_keeps_position() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        state.play(Some(&project), &mut NullSink);
        state.advance_row(&project, &mut NullSink);
        state.advance_row(&project, &mut NullSink);

        state.stop();
        assert!(!state.is_playing());
        assert_eq!(state.position(), PlaybackPosition { song_row: 0, row: 2 });
        assert!(state.tracks().iter().all(|t| t.active_note().is_none()));

        let snapshot = (state.position(), state.tick(), state.tracks().to_vec());
        state.stop();
        assert_eq!(snapshot, (state.position(), state.tick(), state.tracks().to_vec()));
    }

    #[test]
    fn seek_wraps_and_retriggers() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        state.play(Some(&project), &mut NullSink);

        let mut events: Vec<EngineEvent> = Vec::new();
        state.seek(Some(&project), 6, &mut events);
        assert_eq!(state.position(), PlaybackPosition { song_row: 2, row: 0 });
        assert_eq!(
            events,
            vec![
                EngineEvent::RowChanged { row: 0 },
                EngineEvent::SongRowChanged { song_row: 2 },
            ]
        );
    }

    #[test]
    fn seek_while_stopped_waits_for_play() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));

        let mut events: Vec<EngineEvent> = Vec::new();
        state.seek(Some(&project), 3, &mut events);
        assert!(events.is_empty());

        state.play(Some(&project), &mut events);
        assert_eq!(state.position(), PlaybackPosition { song_row: 3, row: 0 });
    }

    #[test]
    fn stopped_render_leaves_buffer_untouched() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        let mut left = [0.25; 32];
        let mut right = [-0.25; 32];
        state.render_block(Some(&project), &mut left, &mut right, &mut NullSink);
        assert!(left.iter().all(|&s| s == 0.25));
        assert!(right.iter().all(|&s| s == -0.25));
    }

    #[test]
    fn empty_song_is_silent_no_op() {
        let mut project = project();
        project.song.clear();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));

        let mut events: Vec<EngineEvent> = Vec::new();
        state.play(Some(&project), &mut events);
        assert!(events.is_empty());

        let mut left = [0.0; 16];
        let mut right = [0.0; 16];
        state.render_block(Some(&project), &mut left, &mut right, &mut events);
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn shorter_pattern_sustains_past_its_end() {
        let mut project = project();
        let mut short = Pattern::new(1, 2, "short");
        short.set_note(1, Some(Note::new(72, Some(1), 0.5)));
        project.add_pattern(short);
        project.song.clear();
        project.push_song_row(&[Some(0), Some(1)]);

        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        state.play(Some(&project), &mut NullSink);
        state.advance_row(&project, &mut NullSink);
        let held = state.track(1).and_then(Track::active_note).copied();
        assert_eq!(held.map(|n| n.pitch), Some(72));

        state.advance_row(&project, &mut NullSink);
        state.advance_row(&project, &mut NullSink);
        assert_eq!(state.position().row, 3);
        assert_eq!(state.track(1).and_then(Track::active_note).copied(), held);
    }

    #[test]
    fn retarget_keeps_position() {
        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        state.play(Some(&project), &mut NullSink);
        for _ in 0..9 {
            state.advance_row(&project, &mut NullSink);
        }
        assert_eq!(state.position(), PlaybackPosition { song_row: 2, row: 1 });

        let mut edited = project.clone();
        edited.song.truncate(2);
        edited.track_count = 3;
        state.retarget(&edited);
        assert!(state.is_playing());
        assert_eq!(state.tracks().len(), 3);
        assert_eq!(state.position(), PlaybackPosition { song_row: 1, row: 1 });
    }

    #[test]
    fn full_sink_counts_drops() {
        struct Full;
        impl EventSink for Full {
            fn emit(&mut self, _: EngineEvent) -> bool {
                false
            }
        }

        let project = project();
        let mut state = EngineState::new(config());
        state.reset(Some(&project));
        state.play(Some(&project), &mut Full);
        assert_eq!(state.dropped_events(), 2);
    }

    #[test]
    fn tempered_mapping_reaches_tracks() {
        let mut project = project();
        let mut pattern = Pattern::new(0, 4, "");
        pattern.set_note(0, Some(Note::new(72, Some(1), 1.0)));
        project.add_pattern(pattern);

        let mut state = EngineState::new(config().with_pitch_mapping(PitchMapping::EqualTempered));
        state.reset(Some(&project));
        state.play(Some(&project), &mut NullSink);
        let increment = state.track(0).map(Track::increment).unwrap_or_default();
        assert!((increment - 2.0).abs() < 1e-12);
    }
}
