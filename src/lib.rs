//! minutier - Meeting transcription and report generation
//!
//! Turns a recorded meeting into a speaker-labeled transcript and a
//! structured summary report, streaming progress events while it works.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diarize;
pub mod error;
pub mod pipeline;
pub mod recording;
pub mod report;
pub mod segment;
pub mod stt;
pub mod summary;

// Core traits (capability seams for collaborators)
pub use audio::recorder::AudioSource;
pub use diarize::Diarizer;
pub use report::ReportWriter;
pub use stt::transcriber::Transcriber;
pub use summary::Summarizer;

// Pipeline
pub use pipeline::{PhaseStatus, PipelineHandle, PipelineResult, ProgressEvent, ReportPipeline};

// Data model
pub use audio::timeline::{TimeSpan, Timeline};
pub use diarize::{DiarizationOutcome, DiarizationStage, SpeakerTurn};
pub use segment::{SegmentPolicy, WorkUnit, plan_units};

// Error handling
pub use error::{MinutierError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
