//! Error types for the audio engine

use thiserror::Error;

/// Errors raised below the `Engine` facade.
///
/// The facade itself never surfaces these to callers; they are logged and
/// turned into silence.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host reports no default output device
    #[error("no output device available")]
    NoOutputDevice,

    /// A named output device was requested but not found
    #[error("output device not found: {0}")]
    DeviceNotFound(String),

    /// The platform refused to create or start an audio stream
    #[error("platform audio unavailable: {0}")]
    PlatformAudioUnavailable(String),

    /// The device only offers a sample format we cannot render
    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),
}

impl EngineError {
    /// Wrap any displayable platform error
    pub fn platform(err: impl std::fmt::Display) -> Self {
        Self::PlatformAudioUnavailable(err.to_string())
    }
}
