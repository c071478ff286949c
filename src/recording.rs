//! Recording session management for meeting capture.
//!
//! A [`RecordingSession`] is an explicit value owned by the caller: it wraps
//! an [`AudioSource`], buffers captured samples, and persists them as a WAV
//! file when stopped. No module-level state is involved; two sessions never
//! interfere.

use crate::audio::recorder::AudioSource;
use crate::defaults;
use crate::error::{MinutierError, Result};
use std::path::{Path, PathBuf};

/// Buffers audio from a capture source and writes it to a WAV file on stop.
pub struct RecordingSession<A: AudioSource> {
    source: A,
    sample_rate: u32,
    captured: Vec<i16>,
    recording: bool,
}

impl<A: AudioSource> RecordingSession<A> {
    /// Create a new session over a capture source.
    pub fn new(source: A) -> Self {
        Self {
            source,
            sample_rate: defaults::SAMPLE_RATE,
            captured: Vec::new(),
            recording: false,
        }
    }

    /// Override the sample rate written to the output file.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Start capture.
    pub fn start(&mut self) -> Result<()> {
        self.source.start()?;
        self.recording = true;
        Ok(())
    }

    /// Pull one batch of samples from the source into the buffer.
    ///
    /// # Returns
    /// Number of samples appended; 0 when nothing new was available.
    pub fn poll(&mut self) -> Result<usize> {
        if !self.recording {
            return Ok(0);
        }
        let samples = self.source.read_samples()?;
        let count = samples.len();
        self.captured.extend_from_slice(&samples);
        Ok(count)
    }

    /// Drain the source until it reports no more samples.
    ///
    /// Only meaningful for finite sources (files, fixed buffers); a live
    /// device never runs dry and should be polled instead.
    pub fn poll_to_end(&mut self) -> Result<usize> {
        let mut total = 0;
        loop {
            let count = self.poll()?;
            if count == 0 {
                break;
            }
            total += count;
        }
        Ok(total)
    }

    /// Duration captured so far, in milliseconds.
    pub fn captured_ms(&self) -> u64 {
        self.captured.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Whether the session is currently capturing.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Stop capture and write the buffered audio to `output`.
    ///
    /// # Returns
    /// The output path, for symmetry with the report writer.
    pub fn stop(&mut self, output: &Path) -> Result<PathBuf> {
        if !self.recording {
            return Err(MinutierError::AudioCapture {
                message: "no recording in progress".to_string(),
            });
        }
        self.source.stop()?;
        self.recording = false;

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(output, spec).map_err(|e| MinutierError::AudioEncode {
                message: format!("Failed to create WAV file: {}", e),
            })?;
        for &sample in &self.captured {
            writer
                .write_sample(sample)
                .map_err(|e| MinutierError::AudioEncode {
                    message: format!("Failed to write WAV sample: {}", e),
                })?;
        }
        writer.finalize().map_err(|e| MinutierError::AudioEncode {
            message: format!("Failed to finalize WAV file: {}", e),
        })?;

        self.captured.clear();
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recorder::MockAudioSource;
    use crate::audio::timeline::Timeline;

    #[test]
    fn test_session_records_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("meeting.wav");

        let source = MockAudioSource::new().with_samples(vec![7i16; 480]);
        let mut session = RecordingSession::new(source);

        session.start().unwrap();
        session.poll_to_end().unwrap();
        let path = session.stop(&output).unwrap();

        assert_eq!(path, output);
        let timeline = Timeline::load(&output).unwrap();
        assert_eq!(timeline.duration_ms(), 480 * 1000 / 16000);
    }

    #[test]
    fn test_captured_ms_tracks_buffer() {
        let source = MockAudioSource::new().with_samples(vec![0i16; 16000]);
        let mut session = RecordingSession::new(source);

        session.start().unwrap();
        session.poll_to_end().unwrap();

        assert_eq!(session.captured_ms(), 1000);
    }

    #[test]
    fn test_stop_without_start_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = RecordingSession::new(MockAudioSource::new());

        let result = session.stop(&dir.path().join("never.wav"));
        assert!(result.is_err());
    }

    #[test]
    fn test_poll_before_start_is_a_noop() {
        let source = MockAudioSource::new().with_samples(vec![1i16; 100]);
        let mut session = RecordingSession::new(source);

        assert_eq!(session.poll().unwrap(), 0);
        assert!(!session.is_recording());
    }

    #[test]
    fn test_start_failure_propagates() {
        let source = MockAudioSource::new().with_start_failure();
        let mut session = RecordingSession::new(source);

        assert!(session.start().is_err());
        assert!(!session.is_recording());
    }

    #[test]
    fn test_two_sessions_are_independent() {
        let mut a = RecordingSession::new(MockAudioSource::new().with_samples(vec![1i16; 320]));
        let mut b = RecordingSession::new(MockAudioSource::new().with_samples(vec![2i16; 160]));

        a.start().unwrap();
        b.start().unwrap();
        a.poll_to_end().unwrap();
        b.poll_to_end().unwrap();

        assert_eq!(a.captured_ms(), 20);
        assert_eq!(b.captured_ms(), 10);
    }
}
