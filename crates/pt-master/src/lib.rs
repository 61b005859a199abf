//! Headless controller for pulsetracker.
//!
//! Owns the current project snapshot and talks to the engine over a
//! lock-free link, so the same API serves live playback through cpal and
//! caller-driven rendering in tests. Offline rendering builds a private
//! engine and never touches the audio device.

pub mod demo;
mod error;
mod wav;

use pt_audio::{engine_link, AudioOutput, ControlLink, CpalOutput};
use pt_engine::{Command, Engine, EngineEvent, NullSink};
use std::path::Path;
use std::sync::Arc;

// Re-export common types so callers don't need pt-engine/pt-audio directly.
pub use error::ControllerError;
pub use pt_audio::AudioError;
pub use pt_engine::{EngineConfig, PitchMapping, PlaybackPosition};
pub use pt_ir::{Project, ProjectError};
pub use wav::{wav_bytes, write_wav, write_wav_file};

/// Capacity of each queue between the controller and the audio thread.
pub const QUEUE_CAPACITY: usize = 256;

/// Headless tracker controller: owns a project and manages playback.
pub struct Controller {
    config: EngineConfig,
    project: Arc<Project>,
    /// Replaced snapshots the engine may still reference
    superseded: Vec<Arc<Project>>,
    link: Option<ControlLink>,
    output: Option<CpalOutput>,
    position: PlaybackPosition,
    playing: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Controller whose engines use `config` (the sample rate is replaced
    /// by the device's or the render call's).
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            project: Arc::new(Project::default()),
            superseded: Vec::new(),
            link: None,
            output: None,
            position: PlaybackPosition::default(),
            playing: false,
        }
    }

    /// Drive an engine the caller owns (a custom host, or a test calling
    /// `RealtimeEngine::process` directly).
    pub fn with_link(mut self, link: ControlLink) -> Self {
        self.link = Some(link);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Project management ---

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Validate `project` and hand it to the engine. Playback stops.
    pub fn load_project(&mut self, project: Project) -> Result<(), ControllerError> {
        project.validate()?;
        for dangling in project.dangling_references() {
            log::warn!("{}: {:?} will play as silence", project.name, dangling);
        }
        log::info!(
            "Loaded {} ({} tracks, {} song rows, {} BPM)",
            project.name,
            project.track_count,
            project.song.len(),
            project.bpm
        );

        let snapshot = Arc::new(project);
        self.send(Command::LoadProject(snapshot.clone()))?;
        self.replace_snapshot(snapshot);
        self.position = PlaybackPosition::default();
        self.playing = false;
        Ok(())
    }

    /// Edit a copy of the project and swap it in without interrupting playback.
    ///
    /// The edit is discarded if the result fails validation.
    pub fn edit_project<F>(&mut self, edit: F) -> Result<(), ControllerError>
    where
        F: FnOnce(&mut Project),
    {
        let mut next = Project::clone(&self.project);
        edit(&mut next);
        next.validate()?;

        let snapshot = Arc::new(next);
        self.send(Command::SwapProject(snapshot.clone()))?;
        self.replace_snapshot(snapshot);
        Ok(())
    }

    /// Make `snapshot` current, keeping the old one alive until only the
    /// controller holds it. The engine may drop its reference on the audio
    /// thread, so that reference must never be the last.
    fn replace_snapshot(&mut self, snapshot: Arc<Project>) {
        let old = std::mem::replace(&mut self.project, snapshot);
        self.superseded.push(old);
        self.release_superseded();
    }

    fn release_superseded(&mut self) {
        self.superseded.retain(|p| Arc::strong_count(p) > 1);
    }

    // --- Real-time playback ---

    /// Open the default audio device and start its stream. Returns the
    /// device sample rate.
    pub fn start_audio(&mut self) -> Result<u32, ControllerError> {
        self.stop_audio();

        let mut output = CpalOutput::open()?;
        let sample_rate = output.sample_rate();
        self.config = self.config.with_sample_rate(sample_rate);

        let engine = Engine::with_project(self.config, self.project.clone());
        let (link, realtime) = engine_link(engine, QUEUE_CAPACITY);
        output.build_stream(realtime)?;
        output.start()?;

        self.link = Some(link);
        self.output = Some(output);
        self.position = PlaybackPosition::default();
        self.playing = false;
        Ok(sample_rate)
    }

    /// Close the audio stream, if one is open.
    pub fn stop_audio(&mut self) {
        if let Some(mut output) = self.output.take() {
            if let Err(e) = output.stop() {
                log::warn!("Failed to stop audio output: {}", e);
            }
            self.link = None;
        }
    }

    pub fn has_audio(&self) -> bool {
        self.output.is_some()
    }

    fn send(&mut self, command: Command) -> Result<(), ControllerError> {
        log::debug!("Command: {:?}", CommandName(&command));
        if let Some(link) = self.link.as_mut() {
            link.send(command)?;
        }
        Ok(())
    }

    pub fn play(&mut self) -> Result<(), ControllerError> {
        self.send(Command::Play)?;
        self.playing = true;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ControllerError> {
        self.send(Command::Stop)?;
        self.playing = false;
        Ok(())
    }

    pub fn seek(&mut self, song_row: usize) -> Result<(), ControllerError> {
        self.send(Command::Seek { song_row })
    }

    /// Whether playback was requested (the engine applies it on its next block).
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last position reported by the engine.
    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    /// Apply events from the engine and release replaced snapshots.
    /// Returns the number of events handled.
    pub fn poll(&mut self) -> usize {
        let Some(link) = self.link.as_mut() else {
            return 0;
        };

        let mut count = 0;
        while let Some(event) = link.poll_event() {
            match event {
                EngineEvent::RowChanged { row } => self.position.row = row,
                EngineEvent::SongRowChanged { song_row } => self.position.song_row = song_row,
            }
            count += 1;
        }

        let retired = link.collect_retired();
        if retired > 0 {
            log::debug!("Engine returned {} project snapshot(s)", retired);
        }
        self.release_superseded();
        count
    }

    // --- Offline rendering ---

    /// Play the project from the top for `frames` frames.
    pub fn render_frames(&self, sample_rate: u32, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let config = self.config.with_sample_rate(sample_rate);
        let mut engine = Engine::with_project(config, self.project.clone());
        engine.play(&mut NullSink);
        engine.render_frames(frames)
    }

    /// Render `seconds` of audio to a 16-bit stereo WAV file.
    pub fn render_to_wav(&self, path: &Path, sample_rate: u32, seconds: f32) -> Result<(), ControllerError> {
        let frames = (sample_rate as f32 * seconds.max(0.0)) as usize;
        let (left, right) = self.render_frames(sample_rate, frames);
        write_wav_file(path, &left, &right, sample_rate)?;
        log::info!("Wrote {} frames to {}", frames, path.display());
        Ok(())
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop_audio();
    }
}

/// Logs a command without dumping the whole project.
struct CommandName<'a>(&'a Command);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Command::LoadProject(p) => write!(f, "LoadProject({})", p.name),
            Command::SwapProject(p) => write!(f, "SwapProject({})", p.name),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_audio::RealtimeEngine;

    fn linked() -> (Controller, RealtimeEngine) {
        let engine = Engine::new(EngineConfig::new(4800));
        let (link, realtime) = engine_link(engine, 32);
        (Controller::new().with_link(link), realtime)
    }

    #[test]
    fn invalid_project_is_rejected() {
        let mut controller = Controller::new();
        let mut project = Project::new("bad");
        project.bpm = 0.0;
        let err = controller.load_project(project).unwrap_err();
        assert!(matches!(err, ControllerError::Project(ProjectError::InvalidTempo(_))));
        assert_eq!(controller.project().name.as_str(), "Untitled");
    }

    #[test]
    fn failed_edit_keeps_snapshot() {
        let mut controller = Controller::new();
        controller.load_project(demo::demo_project()).unwrap();
        let err = controller.edit_project(|p| p.track_count = 0);
        assert!(err.is_err());
        assert_eq!(controller.project().track_count, 8);
    }

    #[test]
    fn poll_tracks_position() {
        let (mut controller, mut realtime) = linked();
        controller.load_project(demo::demo_project()).unwrap();
        controller.play().unwrap();
        controller.seek(2).unwrap();

        realtime.process(&mut [], &mut []);
        // Play reports row 0 of song row 0, then the seek moves to song row 2.
        assert_eq!(controller.poll(), 4);
        assert_eq!(controller.position(), PlaybackPosition { song_row: 2, row: 0 });
    }

    #[test]
    fn replaced_snapshots_outlive_a_full_retire_queue() {
        let engine = Engine::new(EngineConfig::new(4800));
        let (link, mut realtime) = engine_link(engine, 2);
        let mut controller = Controller::new().with_link(link);
        controller.load_project(demo::demo_project()).unwrap();
        realtime.process(&mut [], &mut []);

        let mut replaced = Vec::new();
        for bpm in [100.0, 110.0, 120.0] {
            replaced.push(Arc::downgrade(&controller.project));
            controller.edit_project(|p| p.bpm = bpm).unwrap();
            realtime.process(&mut [], &mut []);
        }
        // The third swap found the retire queue full, so the engine let go
        // of its reference; the controller's copy must still be alive.
        assert!(replaced.iter().all(|weak| weak.upgrade().is_some()));

        controller.poll();
        assert!(replaced.iter().all(|weak| weak.upgrade().is_none()));
        assert_eq!(controller.project().bpm, 120.0);
    }

    #[test]
    fn poll_without_link_is_noop() {
        let mut controller = Controller::new();
        controller.play().unwrap();
        assert!(controller.is_playing());
        assert_eq!(controller.poll(), 0);
    }

    #[test]
    fn command_name_hides_project() {
        let command = Command::LoadProject(Arc::new(Project::new("Song")));
        assert_eq!(format!("{:?}", CommandName(&command)), "LoadProject(Song)");
        assert_eq!(format!("{:?}", CommandName(&Command::Seek { song_row: 3 })), "Seek { song_row: 3 }");
    }
}
