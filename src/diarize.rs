//! Speaker diarization adapter.
//!
//! Diarization is a quality enhancement, never a hard dependency: the
//! [`DiarizationStage`] decides at construction time whether a diarizer is
//! available, and every runtime failure degrades to a skipped outcome so the
//! pipeline can fall back to fixed-size chunking.

use crate::audio::timeline::Timeline;
use crate::error::{MinutierError, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One speaker-attributed turn of the input audio.
///
/// Turns are ordered by start time, non-overlapping, and cover the timeline
/// when diarization succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerTurn {
    pub start_ms: u64,
    pub end_ms: u64,
    pub speaker: Option<String>,
}

impl SpeakerTurn {
    /// Creates a labeled turn.
    pub fn new(start_ms: u64, end_ms: u64, speaker: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            speaker: Some(speaker.into()),
        }
    }

    /// Creates an unlabeled turn.
    pub fn unlabeled(start_ms: u64, end_ms: u64) -> Self {
        Self {
            start_ms,
            end_ms,
            speaker: None,
        }
    }
}

/// Trait for speaker diarization backends.
///
/// This trait allows swapping implementations (remote service vs mock).
/// The input is the path of the normalized WAV copy of the timeline.
pub trait Diarizer: Send + Sync {
    /// Segment the audio file into ordered speaker turns.
    fn diarize(&self, audio: &Path) -> Result<Vec<SpeakerTurn>>;
}

/// Result of the diarization phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiarizationOutcome {
    /// Ordered speaker turns covering the timeline.
    Turns(Vec<SpeakerTurn>),
    /// Diarization did not run; the timeline is one undivided unit.
    Skipped,
}

/// Policy wrapper around an optional diarization capability.
///
/// Whether diarization runs is decided here, once, from configuration:
/// a missing backend, a zero threshold, or an over-long input all produce
/// [`DiarizationOutcome::Skipped`] without touching the backend.
pub struct DiarizationStage {
    diarizer: Option<Arc<dyn Diarizer>>,
    max_duration_ms: u64,
}

impl DiarizationStage {
    /// Creates a stage over an optional backend with a duration threshold.
    pub fn new(diarizer: Option<Arc<dyn Diarizer>>, max_duration_ms: u64) -> Self {
        Self {
            diarizer,
            max_duration_ms,
        }
    }

    /// Creates a stage that always skips.
    pub fn disabled() -> Self {
        Self {
            diarizer: None,
            max_duration_ms: 0,
        }
    }

    /// Run diarization for one timeline, if policy allows.
    ///
    /// A runtime error from the backend is reported to stderr and treated
    /// as skipped; it never fails the pipeline.
    pub fn run(&self, timeline: &Timeline, audio: &Path) -> DiarizationOutcome {
        let Some(diarizer) = &self.diarizer else {
            return DiarizationOutcome::Skipped;
        };
        if self.max_duration_ms == 0 || timeline.duration_ms() > self.max_duration_ms {
            return DiarizationOutcome::Skipped;
        }
        match diarizer.diarize(audio) {
            Ok(turns) if turns.is_empty() => DiarizationOutcome::Skipped,
            Ok(turns) => DiarizationOutcome::Turns(turns),
            Err(e) => {
                eprintln!("minutier: diarization unavailable for this run: {e}");
                DiarizationOutcome::Skipped
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TurnDto {
    start_ms: u64,
    end_ms: u64,
    #[serde(default)]
    speaker: Option<String>,
}

/// Diarization backend over an HTTP service.
///
/// POSTs the WAV file to the configured endpoint and expects a JSON array of
/// `{start_ms, end_ms, speaker}` objects, ordered by start time.
pub struct HttpDiarizer {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpDiarizer {
    /// Creates a diarizer against an HTTP endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(crate::defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| MinutierError::Diarization {
                message: e.to_string(),
            })?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

impl Diarizer for HttpDiarizer {
    fn diarize(&self, audio: &Path) -> Result<Vec<SpeakerTurn>> {
        let bytes = std::fs::read(audio)?;
        let part = reqwest::blocking::multipart::Part::bytes(bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| MinutierError::Diarization {
                message: e.to_string(),
            })?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| MinutierError::Diarization {
                message: e.to_string(),
            })?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(MinutierError::Diarization {
                message: format!("diarization service returned {}: {}", status, body),
            });
        }
        let turns: Vec<TurnDto> = response.json().map_err(|e| MinutierError::Diarization {
            message: e.to_string(),
        })?;
        Ok(turns
            .into_iter()
            .map(|t| SpeakerTurn {
                start_ms: t.start_ms,
                end_ms: t.end_ms,
                speaker: t.speaker,
            })
            .collect())
    }
}

/// Mock diarizer for testing.
#[derive(Debug, Clone, Default)]
pub struct MockDiarizer {
    turns: Vec<SpeakerTurn>,
    should_fail: bool,
}

impl MockDiarizer {
    /// Create a new mock diarizer returning no turns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to return specific turns.
    pub fn with_turns(mut self, turns: Vec<SpeakerTurn>) -> Self {
        self.turns = turns;
        self
    }

    /// Configure the mock to fail on diarize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Diarizer for MockDiarizer {
    fn diarize(&self, _audio: &Path) -> Result<Vec<SpeakerTurn>> {
        if self.should_fail {
            Err(MinutierError::Diarization {
                message: "mock diarization failure".to_string(),
            })
        } else {
            Ok(self.turns.clone())
        }
    }
}
