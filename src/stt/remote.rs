//! Transcription over an OpenAI-compatible HTTP API.

use crate::defaults;
use crate::error::{MinutierError, Result};
use crate::stt::transcriber::Transcriber;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcriber backed by a `audio/transcriptions` multipart endpoint.
///
/// Quota exhaustion (HTTP 429) and transport problems are reported as
/// distinct error kinds so the caller can tell a rate limit from an outage.
pub struct RemoteTranscriber {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl RemoteTranscriber {
    /// Create a transcriber with explicit endpoint settings.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| MinutierError::ApiTransport {
                message: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }
}

impl Transcriber for RemoteTranscriber {
    fn transcribe(&self, wav: &[u8]) -> Result<String> {
        let url = format!(
            "{}/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        );
        let part = reqwest::blocking::multipart::Part::bytes(wav.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| MinutierError::ApiTransport {
                message: e.to_string(),
            })?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| MinutierError::ApiTransport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().unwrap_or_default();
            return Err(MinutierError::ApiQuota {
                message: format!("{}: {}", status, body),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MinutierError::Transcription {
                message: format!("transcription API returned {}: {}", status, body),
            });
        }

        let parsed: TranscriptionResponse =
            response.json().map_err(|e| MinutierError::Transcription {
                message: format!("invalid transcription response: {}", e),
            })?;
        Ok(parsed.text.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
