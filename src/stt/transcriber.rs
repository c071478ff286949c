use crate::error::{MinutierError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Trait for speech-to-text transcription of one encoded audio payload.
///
/// This trait allows swapping implementations (remote API vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe encoded audio to text.
    ///
    /// # Arguments
    /// * `wav` - Encoded WAV bytes (16kHz mono PCM)
    ///
    /// # Returns
    /// Transcribed text or error
    fn transcribe(&self, wav: &[u8]) -> Result<String>;

    /// Get the name of the backing model
    fn model_name(&self) -> &str;
}

/// Implement Transcriber for Arc<T> to allow sharing across workers.
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    fn transcribe(&self, wav: &[u8]) -> Result<String> {
        (**self).transcribe(wav)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    model_name: String,
    response: String,
    should_fail: bool,
    delay: Option<Duration>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            response: "mock transcription".to_string(),
            should_fail: false,
            delay: None,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the mock to sleep before responding
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _wav: &[u8]) -> Result<String> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.should_fail {
            Err(MinutierError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transcriber_returns_response() {
        let transcriber = MockTranscriber::new("test-model").with_response("Hello, this is a test");

        let result = transcriber.transcribe(&[0u8; 100]);

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Hello, this is a test");
    }

    #[test]
    fn test_mock_transcriber_returns_error_when_configured() {
        let transcriber = MockTranscriber::new("test-model").with_failure();

        let result = transcriber.transcribe(&[0u8; 100]);

        assert!(result.is_err());
        match result {
            Err(MinutierError::Transcription { message }) => {
                assert_eq!(message, "mock transcription failure");
            }
            _ => panic!("Expected Transcription error"),
        }
    }

    #[test]
    fn test_mock_transcriber_model_name() {
        let transcriber = MockTranscriber::new("whisper-1");
        assert_eq!(transcriber.model_name(), "whisper-1");
    }

    #[test]
    fn test_mock_transcriber_delay() {
        let transcriber = MockTranscriber::new("slow").with_delay(Duration::from_millis(20));

        let start = std::time::Instant::now();
        transcriber.transcribe(&[]).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_transcriber_trait_is_object_safe() {
        let transcriber: Box<dyn Transcriber> =
            Box::new(MockTranscriber::new("test-model").with_response("boxed test"));

        assert_eq!(transcriber.model_name(), "test-model");
        assert_eq!(transcriber.transcribe(&[]).unwrap(), "boxed test");
    }

    #[test]
    fn test_arc_transcriber_shares_implementation() {
        let inner = Arc::new(MockTranscriber::new("shared").with_response("shared text"));
        let a = inner.clone();
        let b = inner;

        assert_eq!(a.transcribe(&[]).unwrap(), "shared text");
        assert_eq!(b.model_name(), "shared");
    }
}
