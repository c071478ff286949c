//! Progress events: the client-visible contract of a pipeline run.
//!
//! Events are append-only and strictly ordered as produced. Serialized one
//! JSON object per line, tagged by `phase`; a consumer sees either a terminal
//! `done` or a terminal `error`, never both, never neither.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Status of a sequential phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Start,
    Skipped,
    End,
}

/// A single structured notification describing pipeline progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Diarization phase; `count` is the number of resulting units
    /// (1 for a skipped run: one undivided unit).
    Diarization {
        status: PhaseStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
    },
    /// Transcription phase; the opening event carries `total` with
    /// `done = 0`, each completion carries the incremented `done`.
    Transcription {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<usize>,
        done: usize,
    },
    /// Summary phase boundary.
    Summary { status: PhaseStatus },
    /// Document phase boundary; `path` is present on `end`.
    Document {
        status: PhaseStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    /// Terminal failure; the run stops and no document is produced.
    Error { message: String },
    /// Terminal success, carrying the persisted report path.
    Done { path: PathBuf },
}

impl ProgressEvent {
    /// True for the two terminal variants.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Error { .. } | ProgressEvent::Done { .. })
    }
}
