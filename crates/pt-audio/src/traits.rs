//! Audio output trait and error types.

/// Error type for audio operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("Device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("Stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("Playback error: {0}")]
    Playback(String),
    /// No audio device available
    #[error("No audio device available")]
    NoDevice,
    /// The device does not offer f32 output
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
    /// The command queue to the audio thread is full
    #[error("Command queue full")]
    QueueFull,
}

/// Trait for audio output backends.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback (the stream outputs silence).
    fn stop(&mut self) -> Result<(), AudioError>;
}
