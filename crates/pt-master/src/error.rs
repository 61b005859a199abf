//! Controller error type.

use pt_audio::AudioError;
use pt_ir::ProjectError;

/// Anything that can go wrong on the control side.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The project failed validation and was not sent to the engine
    #[error("Invalid project: {0}")]
    Project(#[from] ProjectError),
    /// Audio device or queue failure
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
    /// WAV encoding failed
    #[error("WAV export error: {0}")]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
