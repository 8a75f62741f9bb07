//! Error handling for Ambient
//!
//! Only the outer surfaces (catalog/config files, id lookups, CLI) return
//! these errors. Asset load failures are logged by the track controllers and
//! never escape `load()`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Ambient operations
pub type Result<T> = std::result::Result<T, AmbientError>;

/// Main error type for Ambient operations
#[derive(Error, Debug)]
pub enum AmbientError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Audio Errors
    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Catalog Errors
    #[error("Unknown season: {season}")]
    UnknownSeason { season: String },

    #[error("Unknown sound: {sound_id}")]
    UnknownSound { sound_id: String },

    // Session Errors
    #[error("Invalid timer duration: {seconds}s (allowed: {allowed:?})")]
    InvalidDuration { seconds: u32, allowed: Vec<u32> },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AmbientError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AmbientError::FileNotFound { .. } => "FILE_NOT_FOUND",
            AmbientError::FileReadError { .. } => "FILE_READ_ERROR",
            AmbientError::InvalidAudio { .. } => "INVALID_AUDIO",
            AmbientError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AmbientError::EmptyAudio => "EMPTY_AUDIO",
            AmbientError::UnknownSeason { .. } => "UNKNOWN_SEASON",
            AmbientError::UnknownSound { .. } => "UNKNOWN_SOUND",
            AmbientError::InvalidDuration { .. } => "INVALID_DURATION",
            AmbientError::InvalidConfig { .. } => "INVALID_CONFIG",
            AmbientError::Io(_) => "IO_ERROR",
            AmbientError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the session usable; the worst outcome is a
    /// silent track.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AmbientError::FileNotFound { .. }
                | AmbientError::InvalidAudio { .. }
                | AmbientError::UnsupportedFormat { .. }
                | AmbientError::EmptyAudio
                | AmbientError::UnknownSound { .. }
                | AmbientError::InvalidDuration { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AmbientError::FileNotFound { .. } => vec![
                "Check that the asset root points at the sound directory",
                "Run 'ambient-cli check-assets' to list missing sounds",
            ],
            AmbientError::InvalidAudio { .. } | AmbientError::EmptyAudio => vec![
                "Re-export the sound as a WAV file",
                "Check if the file plays in another application",
            ],
            AmbientError::UnsupportedFormat { .. } => vec![
                "Convert the sound to mono or stereo WAV",
                "Supported formats: WAV (PCM 8/16/24/32-bit, float 32-bit)",
            ],
            AmbientError::UnknownSeason { .. } => {
                vec!["Available seasons: spring, summer, autumn, winter"]
            }
            AmbientError::UnknownSound { .. } => {
                vec!["Run 'ambient-cli catalog' to list available sounds"]
            }
            AmbientError::InvalidDuration { .. } => {
                vec!["Pick one of the preset durations", "Reset the timer before changing duration"]
            }
            AmbientError::InvalidConfig { .. } => vec![
                "Run 'ambient-cli config' to print a valid default configuration",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AmbientError::UnknownSound {
            sound_id: "thunder".to_string(),
        };
        assert_eq!(err.error_code(), "UNKNOWN_SOUND");
        assert_eq!(err.to_string(), "Unknown sound: thunder");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = AmbientError::UnsupportedFormat {
            format: "mp3".to_string(),
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_errors_not_recoverable() {
        let err = AmbientError::InvalidConfig {
            reason: "empty presets".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: AmbientError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
