//! The meeting-report pipeline: diarization → transcription → summary →
//! document, exposed as a live event stream.
//!
//! Phases run strictly in order on one thread; only the transcription phase
//! fans out to the bounded worker pool. The driver reads events from a
//! bounded channel until it closes; the terminal event is exactly one of
//! `done` or `error`.

use crate::audio::timeline::Timeline;
use crate::defaults;
use crate::diarize::{DiarizationOutcome, DiarizationStage};
use crate::error::Result;
use crate::pipeline::event::{PhaseStatus, ProgressEvent};
use crate::report::ReportWriter;
use crate::segment::{SegmentPolicy, WorkUnit, plan_units};
use crate::stt::pool::TranscriptionPool;
use crate::stt::transcriber::Transcriber;
use crate::summary::{REPORT_INSTRUCTION, Summarizer};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Terminal value of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub transcript: String,
    pub summary: String,
    pub report_path: PathBuf,
}

/// Orchestrates one meeting-report run over its collaborators.
pub struct ReportPipeline {
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
    report_writer: Arc<dyn ReportWriter>,
    diarization: DiarizationStage,
    policy: SegmentPolicy,
    workers: usize,
    event_buffer: usize,
}

impl ReportPipeline {
    /// Creates a pipeline with diarization disabled and default policy.
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
        report_writer: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            transcriber,
            summarizer,
            report_writer,
            diarization: DiarizationStage::disabled(),
            policy: SegmentPolicy::default(),
            workers: defaults::WORKER_COUNT,
            event_buffer: defaults::EVENT_BUFFER,
        }
    }

    /// Sets the diarization stage.
    pub fn with_diarization(mut self, diarization: DiarizationStage) -> Self {
        self.diarization = diarization;
        self
    }

    /// Sets the segmentation policy.
    pub fn with_policy(mut self, policy: SegmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the transcription worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the event channel capacity.
    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    /// Starts the pipeline on a background thread.
    ///
    /// # Returns
    /// Handle carrying the live event stream and the final result.
    pub fn spawn(self, input: PathBuf) -> PipelineHandle {
        let (event_tx, event_rx) = bounded(self.event_buffer);
        let thread = thread::spawn(move || self.run(&input, &event_tx));
        PipelineHandle {
            events: event_rx,
            thread,
        }
    }

    /// Runs the pipeline to completion, writing events into `events`.
    ///
    /// Every failure inside the run is converted into exactly one terminal
    /// `error` event; no error crosses the stream boundary. A disconnected
    /// consumer stops observing, not the run: the report is still written
    /// and temporary files are still removed.
    pub fn run(self, input: &Path, events: &Sender<ProgressEvent>) -> Option<PipelineResult> {
        let mut emit = |event: ProgressEvent| {
            events.send(event).ok();
        };
        match self.execute(input, &mut emit) {
            Ok(result) => {
                emit(ProgressEvent::Done {
                    path: result.report_path.clone(),
                });
                Some(result)
            }
            Err(e) => {
                emit(ProgressEvent::Error {
                    message: e.to_string(),
                });
                None
            }
        }
    }

    fn execute(
        &self,
        input: &Path,
        emit: &mut dyn FnMut(ProgressEvent),
    ) -> Result<PipelineResult> {
        // Entry: normalize the input into the uniform timeline representation
        // and a temporary WAV copy for the diarizer. The TempPath guard
        // removes the copy on every exit path.
        let timeline = Timeline::load(input)?;
        let tmp = tempfile::Builder::new()
            .prefix("minutier-")
            .suffix(".wav")
            .tempfile()?;
        let tmp_wav = tmp.into_temp_path();
        timeline.write_wav(&tmp_wav)?;

        emit(ProgressEvent::Diarization {
            status: PhaseStatus::Start,
            count: None,
        });
        let turns = match self.diarization.run(&timeline, &tmp_wav) {
            DiarizationOutcome::Turns(turns) => {
                emit(ProgressEvent::Diarization {
                    status: PhaseStatus::End,
                    count: Some(turns.len()),
                });
                Some(turns)
            }
            DiarizationOutcome::Skipped => {
                emit(ProgressEvent::Diarization {
                    status: PhaseStatus::Skipped,
                    count: Some(1),
                });
                None
            }
        };

        let units = plan_units(&timeline, turns.as_deref(), &self.policy);
        emit(ProgressEvent::Transcription {
            total: Some(units.len()),
            done: 0,
        });
        let pool = TranscriptionPool::new(self.transcriber.clone(), self.workers);
        let texts = pool.transcribe_all(&timeline, &units, |done, _total| {
            emit(ProgressEvent::Transcription { total: None, done });
        })?;
        let transcript = assemble_transcript(&units, &texts);

        emit(ProgressEvent::Summary {
            status: PhaseStatus::Start,
        });
        let summary = self.summarizer.summarize(REPORT_INSTRUCTION, &transcript)?;
        emit(ProgressEvent::Summary {
            status: PhaseStatus::End,
        });

        emit(ProgressEvent::Document {
            status: PhaseStatus::Start,
            path: None,
        });
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("meeting");
        let report_path = self.report_writer.write(stem, &transcript, &summary)?;
        emit(ProgressEvent::Document {
            status: PhaseStatus::End,
            path: Some(report_path.clone()),
        });

        Ok(PipelineResult {
            transcript,
            summary,
            report_path,
        })
    }
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    events: Receiver<ProgressEvent>,
    thread: JoinHandle<Option<PipelineResult>>,
}

impl PipelineHandle {
    /// The live event stream; iterate it until the channel closes.
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Waits for the run to finish and returns its result.
    ///
    /// Returns `None` when the run failed (the stream carried the `error`
    /// event) or the pipeline thread panicked.
    pub fn join(self) -> Option<PipelineResult> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => {
                eprintln!("minutier: pipeline thread panicked");
                None
            }
        }
    }
}

/// Reassemble the final transcript from unit texts in index order.
///
/// Speaker labels are prefixed in brackets when any unit carries one;
/// otherwise the texts are used directly.
fn assemble_transcript(units: &[WorkUnit], texts: &[String]) -> String {
    let labeled = units.iter().any(|u| u.speaker.is_some());
    if labeled {
        units
            .iter()
            .zip(texts)
            .map(|(unit, text)| match &unit.speaker {
                Some(speaker) => format!("[{}] {}", speaker, text),
                None => text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        texts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::timeline::TimeSpan;
    use crate::diarize::{MockDiarizer, SpeakerTurn};
    use crate::report::{MarkdownReportWriter, MockReportWriter};
    use crate::stt::transcriber::MockTranscriber;
    use crate::summary::MockSummarizer;

    fn write_wav(path: &Path, duration_ms: u64) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(duration_ms * 16) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn unit(index: usize, speaker: Option<&str>) -> WorkUnit {
        WorkUnit {
            index,
            span: TimeSpan::new(index as u64 * 1000, (index as u64 + 1) * 1000),
            speaker: speaker.map(str::to_string),
        }
    }

    #[test]
    fn test_assemble_with_labels() {
        let units = vec![unit(0, Some("SPEAKER_00")), unit(1, Some("SPEAKER_01"))];
        let texts = vec!["hello".to_string(), "hi there".to_string()];

        assert_eq!(
            assemble_transcript(&units, &texts),
            "[SPEAKER_00] hello\n[SPEAKER_01] hi there"
        );
    }

    #[test]
    fn test_assemble_without_labels() {
        let units = vec![unit(0, None), unit(1, None)];
        let texts = vec!["part one".to_string(), "part two".to_string()];

        assert_eq!(assemble_transcript(&units, &texts), "part one\npart two");
    }

    #[test]
    fn test_assemble_mixed_labels_keeps_unlabeled_raw() {
        let units = vec![unit(0, Some("SPEAKER_00")), unit(1, None)];
        let texts = vec!["a".to_string(), "b".to_string()];

        assert_eq!(assemble_transcript(&units, &texts), "[SPEAKER_00] a\nb");
    }

    #[test]
    fn test_successful_run_emits_full_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("standup.wav");
        write_wav(&input, 1000);

        let pipeline = ReportPipeline::new(
            Arc::new(MockTranscriber::new("mock").with_response("hello world")),
            Arc::new(MockSummarizer::new().with_response("a summary")),
            Arc::new(MarkdownReportWriter::new(dir.path().join("reports"))),
        );

        let handle = pipeline.spawn(input);
        let events: Vec<ProgressEvent> = handle.events().iter().collect();
        let result = handle.join().unwrap();

        let report_path = dir.path().join("reports").join("standup.report.md");
        assert_eq!(
            events,
            vec![
                ProgressEvent::Diarization {
                    status: PhaseStatus::Start,
                    count: None,
                },
                ProgressEvent::Diarization {
                    status: PhaseStatus::Skipped,
                    count: Some(1),
                },
                ProgressEvent::Transcription {
                    total: Some(1),
                    done: 0,
                },
                ProgressEvent::Transcription {
                    total: None,
                    done: 1,
                },
                ProgressEvent::Summary {
                    status: PhaseStatus::Start,
                },
                ProgressEvent::Summary {
                    status: PhaseStatus::End,
                },
                ProgressEvent::Document {
                    status: PhaseStatus::Start,
                    path: None,
                },
                ProgressEvent::Document {
                    status: PhaseStatus::End,
                    path: Some(report_path.clone()),
                },
                ProgressEvent::Done {
                    path: report_path.clone(),
                },
            ]
        );
        assert_eq!(result.transcript, "hello world");
        assert_eq!(result.summary, "a summary");
        assert_eq!(result.report_path, report_path);
        assert!(report_path.exists());
    }

    #[test]
    fn test_diarized_run_labels_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("duet.wav");
        write_wav(&input, 1000);

        let turns = vec![
            SpeakerTurn::new(0, 500, "SPEAKER_00"),
            SpeakerTurn::new(500, 1000, "SPEAKER_01"),
        ];
        let pipeline = ReportPipeline::new(
            Arc::new(MockTranscriber::new("mock").with_response("hello")),
            Arc::new(MockSummarizer::new()),
            Arc::new(MockReportWriter::new("/tmp/duet.report.md")),
        )
        .with_diarization(DiarizationStage::new(
            Some(Arc::new(MockDiarizer::new().with_turns(turns))),
            60_000,
        ));

        let handle = pipeline.spawn(input);
        let events: Vec<ProgressEvent> = handle.events().iter().collect();
        let result = handle.join().unwrap();

        assert!(events.contains(&ProgressEvent::Diarization {
            status: PhaseStatus::End,
            count: Some(2),
        }));
        assert!(events.contains(&ProgressEvent::Transcription {
            total: Some(2),
            done: 0,
        }));
        assert_eq!(result.transcript, "[SPEAKER_00] hello\n[SPEAKER_01] hello");
    }

    #[test]
    fn test_transcription_failure_is_one_terminal_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.wav");
        write_wav(&input, 1000);

        let pipeline = ReportPipeline::new(
            Arc::new(MockTranscriber::new("mock").with_failure()),
            Arc::new(MockSummarizer::new()),
            Arc::new(MockReportWriter::new("/tmp/never.report.md")),
        );

        let handle = pipeline.spawn(input);
        let events: Vec<ProgressEvent> = handle.events().iter().collect();
        let result = handle.join();

        assert!(result.is_none());
        let errors: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Error { .. }))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(events.last().unwrap().is_terminal());
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, ProgressEvent::Document { .. }))
        );
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, ProgressEvent::Done { .. }))
        );
    }

    #[test]
    fn test_unreadable_input_is_an_error_before_any_phase() {
        let pipeline = ReportPipeline::new(
            Arc::new(MockTranscriber::new("mock")),
            Arc::new(MockSummarizer::new()),
            Arc::new(MockReportWriter::new("/tmp/never.report.md")),
        );

        let handle = pipeline.spawn(PathBuf::from("/nonexistent/input.wav"));
        let events: Vec<ProgressEvent> = handle.events().iter().collect();

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ProgressEvent::Error { .. }));
        assert!(handle.join().is_none());
    }

    #[test]
    fn test_report_failure_surfaces_as_document_phase_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("meeting.wav");
        write_wav(&input, 1000);

        let pipeline = ReportPipeline::new(
            Arc::new(MockTranscriber::new("mock")),
            Arc::new(MockSummarizer::new()),
            Arc::new(MockReportWriter::new("/tmp/never.report.md").with_failure()),
        );

        let handle = pipeline.spawn(input);
        let events: Vec<ProgressEvent> = handle.events().iter().collect();

        // Document start was emitted, then the failure became the terminal error.
        assert!(events.contains(&ProgressEvent::Document {
            status: PhaseStatus::Start,
            path: None,
        }));
        match events.last().unwrap() {
            ProgressEvent::Error { message } => {
                assert!(message.contains("Report generation failed"));
            }
            other => panic!("Expected terminal error, got {:?}", other),
        }
        assert!(handle.join().is_none());
    }

    #[test]
    fn test_disconnected_consumer_does_not_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("solo.wav");
        write_wav(&input, 1000);

        let pipeline = ReportPipeline::new(
            Arc::new(MockTranscriber::new("mock").with_response("text")),
            Arc::new(MockSummarizer::new()),
            Arc::new(MarkdownReportWriter::new(dir.path().join("reports"))),
        )
        .with_event_buffer(1);

        let handle = pipeline.spawn(input);
        // Drop the receiver immediately: nobody observes the stream.
        let PipelineHandle { events, thread } = handle;
        drop(events);

        let result = thread.join().unwrap().unwrap();
        assert!(result.report_path.exists());
    }
}
