//! Error types for minutier.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinutierError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio errors
    #[error("Audio decode failed: {message}")]
    AudioDecode { message: String },

    #[error("Audio encode failed: {message}")]
    AudioEncode { message: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Transcription errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // API errors
    #[error("API transport error: {message}")]
    ApiTransport { message: String },

    #[error("API quota exceeded: {message}")]
    ApiQuota { message: String },

    // Diarization errors (recoverable: the pipeline degrades to "skipped")
    #[error("Diarization failed: {message}")]
    Diarization { message: String },

    // Summarization errors
    #[error("Summarization failed: {message}")]
    Summary { message: String },

    // Report generation errors
    #[error("Report generation failed: {message}")]
    Report { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, MinutierError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_invalid_value_display() {
        let error = MinutierError::ConfigInvalidValue {
            key: "pipeline.workers".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for pipeline.workers: must be positive"
        );
    }

    #[test]
    fn test_audio_decode_display() {
        let error = MinutierError::AudioDecode {
            message: "not a WAV file".to_string(),
        };
        assert_eq!(error.to_string(), "Audio decode failed: not a WAV file");
    }

    #[test]
    fn test_transcription_display() {
        let error = MinutierError::Transcription {
            message: "empty response".to_string(),
        };
        assert_eq!(error.to_string(), "Transcription failed: empty response");
    }

    #[test]
    fn test_api_transport_display() {
        let error = MinutierError::ApiTransport {
            message: "connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "API transport error: connection refused");
    }

    #[test]
    fn test_api_quota_display() {
        let error = MinutierError::ApiQuota {
            message: "429 Too Many Requests".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "API quota exceeded: 429 Too Many Requests"
        );
    }

    #[test]
    fn test_diarization_display() {
        let error = MinutierError::Diarization {
            message: "service unavailable".to_string(),
        };
        assert_eq!(error.to_string(), "Diarization failed: service unavailable");
    }

    #[test]
    fn test_summary_display() {
        let error = MinutierError::Summary {
            message: "no choices in response".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Summarization failed: no choices in response"
        );
    }

    #[test]
    fn test_report_display() {
        let error = MinutierError::Report {
            message: "disk full".to_string(),
        };
        assert_eq!(error.to_string(), "Report generation failed: disk full");
    }

    #[test]
    fn test_other_display() {
        let error = MinutierError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: MinutierError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: MinutierError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: MinutierError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<MinutierError>();
        assert_sync::<MinutierError>();
    }
}
