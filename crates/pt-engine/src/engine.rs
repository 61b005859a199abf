//! Main playback engine.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use pt_ir::Project;

use crate::config::EngineConfig;
use crate::message::{Command, EventSink, NullSink};
use crate::state::{EngineState, PlaybackPosition};
use crate::track::Track;

/// The playback engine.
///
/// Holds a shared, read-only project snapshot and the transport state.
/// Methods that hand back an `Arc<Project>` return the snapshot being
/// replaced, so a real-time host can pass it elsewhere to be dropped.
pub struct Engine {
    /// The project being played
    project: Option<Arc<Project>>,
    /// Transport and track state
    state: EngineState,
}

impl Engine {
    /// Create an engine with no project.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            project: None,
            state: EngineState::new(config),
        }
    }

    /// Create an engine and load `project`.
    pub fn with_project(config: EngineConfig, project: Arc<Project>) -> Self {
        let mut engine = Self::new(config);
        engine.load_project(project);
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        self.state.config()
    }

    pub fn project(&self) -> Option<&Arc<Project>> {
        self.project.as_ref()
    }

    /// Replace the project. Playback stops and the cursor returns to the top.
    pub fn load_project(&mut self, project: Arc<Project>) -> Option<Arc<Project>> {
        self.state.reset(Some(&project));
        self.project.replace(project)
    }

    /// Replace the project, keeping position and play state.
    pub fn swap_project(&mut self, project: Arc<Project>) -> Option<Arc<Project>> {
        self.state.retarget(&project);
        self.project.replace(project)
    }

    /// Start playback; the first row triggers immediately.
    pub fn play(&mut self, sink: &mut impl EventSink) {
        self.state.play(self.project.as_deref(), sink);
    }

    /// Stop playback. Sustained notes are forgotten, see [`EngineState::stop`].
    pub fn stop(&mut self) {
        self.state.stop();
    }

    /// Jump to the start of a song row.
    pub fn seek(&mut self, song_row: usize, sink: &mut impl EventSink) {
        self.state.seek(self.project.as_deref(), song_row, sink);
    }

    /// Apply a transport command.
    pub fn handle_command(&mut self, command: Command, sink: &mut impl EventSink) -> Option<Arc<Project>> {
        match command {
            Command::LoadProject(project) => self.load_project(project),
            Command::SwapProject(project) => self.swap_project(project),
            Command::Play => {
                self.play(sink);
                None
            }
            Command::Stop => {
                self.stop();
                None
            }
            Command::Seek { song_row } => {
                self.seek(song_row, sink);
                None
            }
        }
    }

    /// Mix one block into `left` and `right` (additive).
    pub fn render_block(&mut self, left: &mut [f32], right: &mut [f32], sink: &mut impl EventSink) {
        let project = self.project.as_deref();
        let state = &mut self.state;

        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| state.render_block(project, left, right, sink));

        #[cfg(not(feature = "alloc_check"))]
        state.render_block(project, left, right, sink);
    }

    /// Render `frames` frames into new buffers, discarding events.
    pub fn render_frames(&mut self, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        self.render_block(&mut left, &mut right, &mut NullSink);
        (left, right)
    }

    pub fn position(&self) -> PlaybackPosition {
        self.state.position()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.state.track(index)
    }

    pub fn tracks(&self) -> &[Track] {
        self.state.tracks()
    }

    /// Events lost because the sink was full.
    pub fn dropped_events(&self) -> u64 {
        self.state.dropped_events()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }
}
