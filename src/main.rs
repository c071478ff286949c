use anyhow::{Context, Result, bail};
use clap::Parser;
use minutier::cli::{Cli, Commands};
use minutier::config::Config;
use minutier::diarize::{DiarizationStage, HttpDiarizer};
use minutier::pipeline::{ProgressEvent, ReportPipeline};
use minutier::report::MarkdownReportWriter;
use minutier::segment::SegmentPolicy;
use minutier::stt::RemoteTranscriber;
use minutier::summary::{ChatSummarizer, REPORT_INSTRUCTION, Summarizer};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).with_env_overrides();

    match cli.command {
        Commands::Transcribe {
            audio,
            output_dir,
            workers,
            no_diarization,
        } => run_transcribe(
            config,
            audio,
            output_dir,
            workers,
            no_diarization,
            cli.quiet,
        ),
        Commands::Summarize { transcript } => run_summarize(config, &transcript),
    }
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load_or_default(path),
        None => Config::load_or_default(&Config::default_path()),
    }
}

fn api_key(config: &Config) -> Result<String> {
    config
        .api
        .api_key
        .clone()
        .context("no API key configured — set api.api_key or MINUTIER_API_KEY")
}

fn run_transcribe(
    config: Config,
    audio: PathBuf,
    output_dir: Option<PathBuf>,
    workers: Option<usize>,
    no_diarization: bool,
    quiet: bool,
) -> Result<()> {
    let api_key = api_key(&config)?;

    let transcriber = Arc::new(RemoteTranscriber::new(
        &config.api.base_url,
        &api_key,
        &config.api.transcription_model,
    )?);
    let summarizer = Arc::new(ChatSummarizer::new(
        &config.api.base_url,
        &api_key,
        &config.api.summary_model,
    )?);
    let report_writer = Arc::new(MarkdownReportWriter::new(
        output_dir.unwrap_or_else(|| config.output.dir.clone()),
    ));

    let diarization = match (&config.diarization.endpoint, no_diarization) {
        (Some(endpoint), false) => DiarizationStage::new(
            Some(Arc::new(HttpDiarizer::new(endpoint)?)),
            config.diarization.max_duration_secs * 1000,
        ),
        _ => DiarizationStage::disabled(),
    };

    let pipeline = ReportPipeline::new(transcriber, summarizer, report_writer)
        .with_diarization(diarization)
        .with_policy(SegmentPolicy {
            max_upload_bytes: config.pipeline.max_upload_bytes,
            chunk_ms: config.pipeline.chunk_secs * 1000,
        })
        .with_workers(workers.unwrap_or(config.pipeline.workers));

    if !quiet {
        eprintln!("Transcribing {}...", audio.display());
    }

    let handle = pipeline.spawn(audio);
    let stdout = std::io::stdout();
    let mut failed = false;
    for event in handle.events().iter() {
        if matches!(event, ProgressEvent::Error { .. }) {
            failed = true;
        }
        let line = serde_json::to_string(&event)?;
        let mut out = stdout.lock();
        writeln!(out, "{line}")?;
        out.flush()?;
    }

    match handle.join() {
        Some(result) => {
            if !quiet {
                eprintln!("Report written to {}", result.report_path.display());
            }
            Ok(())
        }
        None => {
            // The error event already went to stdout; the exit code mirrors it.
            if failed && !quiet {
                eprintln!("Run failed — see the error event above.");
            }
            bail!("transcription run failed");
        }
    }
}

fn run_summarize(config: Config, transcript_path: &Path) -> Result<()> {
    let api_key = api_key(&config)?;
    let transcript = std::fs::read_to_string(transcript_path)
        .with_context(|| format!("cannot read transcript {}", transcript_path.display()))?;

    let summarizer = ChatSummarizer::new(
        &config.api.base_url,
        &api_key,
        &config.api.summary_model,
    )?;
    let summary = summarizer.summarize(REPORT_INSTRUCTION, &transcript)?;
    println!("{summary}");
    Ok(())
}
