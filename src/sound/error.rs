//! Buzzer error types.

use thiserror::Error;

/// Errors raised by the buzzer and its worker thread.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device could be opened.
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The output stream rejected a new sink.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic playback failure.
    #[error("playback failed: {0}")]
    PlaybackError(String),

    /// The worker is still busy with earlier cues.
    #[error("buzzer queue is full, dropped {0}")]
    QueueFull(String),

    /// The worker thread has exited.
    #[error("buzzer worker is not running")]
    QueueClosed,

    /// The worker thread could not be started or stopped cleanly.
    #[error("buzzer worker failed: {0}")]
    WorkerError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if the cue hand-off failed rather than the audio itself.
    #[must_use]
    pub fn is_queue_error(&self) -> bool {
        matches!(self, Self::QueueFull(_) | Self::QueueClosed)
    }

    /// Returns a short hint for the operator.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect a speaker or run with --no-sound",
            Self::StreamError(_) => "check the audio configuration",
            Self::PlaybackError(_) | Self::WorkerError(_) => "restart the timer",
            Self::QueueFull(_) => "cues are arriving faster than they can be played",
            Self::QueueClosed => "the buzzer stopped; restart the timer to restore sound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));

        let err = SoundError::QueueFull("round_end".to_string());
        assert_eq!(err.to_string(), "buzzer queue is full, dropped round_end");

        assert_eq!(
            SoundError::QueueClosed.to_string(),
            "buzzer worker is not running"
        );
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
        assert!(!SoundError::QueueClosed.is_device_error());
    }

    #[test]
    fn test_is_queue_error() {
        assert!(SoundError::QueueFull("x".into()).is_queue_error());
        assert!(SoundError::QueueClosed.is_queue_error());
        assert!(!SoundError::WorkerError("x".into()).is_queue_error());
    }

    #[test]
    fn test_suggestion() {
        let err = SoundError::DeviceNotAvailable("x".into());
        assert!(err.suggestion().contains("--no-sound"));
        assert!(SoundError::QueueClosed.suggestion().contains("restart"));
    }
}
