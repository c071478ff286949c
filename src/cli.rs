//! Command-line interface for minutier
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Meeting transcription and report generation
#[derive(Parser, Debug)]
#[command(
    name = "minutier",
    version,
    about = "Meeting transcription and report generation"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (the event stream is still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a recording and generate the meeting report
    Transcribe {
        /// Path to the recorded audio file (WAV)
        audio: PathBuf,

        /// Directory the report is written into (default: from config)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Number of concurrent transcription workers
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Skip speaker diarization even when a service is configured
        #[arg(long)]
        no_diarization: bool,
    },

    /// Summarize an existing transcript file without re-transcribing
    Summarize {
        /// Path to a plain-text transcript
        transcript: PathBuf,
    },
}
