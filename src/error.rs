//! Custom error types for the application

use thiserror::Error;

/// Application-specific error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Audio device related errors
    #[error("Audio device error: {0}")]
    AudioDevice(String),
    /// Audio stream related errors
    #[error("Audio stream error: {0}")]
    AudioStream(String),
    /// Invalid command line configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// The renderer was started without a drawing surface
    #[error("No drawing surface attached to the waveform renderer")]
    SurfaceUnavailable,

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cpal::DevicesError> for AppError {
    fn from(err: cpal::DevicesError) -> Self {
        AppError::AudioDevice(format!("Failed to enumerate devices: {}", err))
    }
}

impl From<cpal::DeviceNameError> for AppError {
    fn from(err: cpal::DeviceNameError) -> Self {
        AppError::AudioDevice(format!("Failed to get device name: {}", err))
    }
}

impl From<cpal::SupportedStreamConfigsError> for AppError {
    fn from(err: cpal::SupportedStreamConfigsError) -> Self {
        AppError::AudioDevice(format!("Failed to get supported stream configs: {}", err))
    }
}

impl From<cpal::BuildStreamError> for AppError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AppError::AudioStream(format!("Failed to build audio stream: {}", err))
    }
}

impl From<cpal::PlayStreamError> for AppError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AppError::AudioStream(format!("Failed to play audio stream: {}", err))
    }
}

impl From<cpal::PauseStreamError> for AppError {
    fn from(err: cpal::PauseStreamError) -> Self {
        AppError::AudioStream(format!("Failed to pause audio stream: {}", err))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::AudioDevice("No default input device available".to_string());
        assert_eq!(
            err.to_string(),
            "Audio device error: No default input device available"
        );
        assert!(AppError::SurfaceUnavailable.to_string().contains("surface"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
