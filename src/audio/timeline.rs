//! Decoded audio timeline: the sliceable, duration-bearing input to the pipeline.

use crate::defaults::SAMPLE_RATE;
use crate::error::{MinutierError, Result};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Half-open time range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TimeSpan {
    /// Creates a span from start and end, in milliseconds.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Duration covered by this span.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// In-memory decoded representation of an audio recording.
///
/// Samples are normalized to 16kHz mono i16 PCM on load; arbitrary input
/// rates and channel counts are downmixed and resampled. Immutable once
/// loaded. `source_bytes` is the encoded size of the original input, used
/// by the chunking policy.
pub struct Timeline {
    samples: Vec<i16>,
    sample_rate: u32,
    source_bytes: u64,
}

impl Timeline {
    /// Load and decode an audio file into a normalized timeline.
    pub fn load(path: &Path) -> Result<Self> {
        let source_bytes = std::fs::metadata(path)?.len();
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Self::from_reader(reader, source_bytes)
    }

    /// Decode from any reader (for testing/flexibility).
    pub fn from_reader(reader: impl Read + Seek, source_bytes: u64) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| MinutierError::AudioDecode {
                message: format!("Failed to parse WAV input: {}", e),
            })?;

        let spec = wav_reader.spec();
        let source_rate = spec.sample_rate;
        let source_channels = spec.channels;

        let raw_samples: Vec<i16> = wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| MinutierError::AudioDecode {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        // Downmix stereo to mono
        let mono_samples = if source_channels == 2 {
            raw_samples
                .chunks_exact(2)
                .map(|pair| {
                    let left = pair[0] as i32;
                    let right = pair[1] as i32;
                    ((left + right) / 2) as i16
                })
                .collect()
        } else {
            raw_samples
        };

        // Resample to 16kHz if needed
        let samples = if source_rate != SAMPLE_RATE {
            resample(&mono_samples, source_rate, SAMPLE_RATE)
        } else {
            mono_samples
        };

        Ok(Self {
            samples,
            sample_rate: SAMPLE_RATE,
            source_bytes,
        })
    }

    /// Build a timeline directly from normalized samples.
    ///
    /// `source_bytes` defaults to the raw PCM size; override it with
    /// [`Timeline::with_source_bytes`] when the encoded input size matters.
    pub fn from_samples(samples: Vec<i16>, sample_rate: u32) -> Self {
        let source_bytes = (samples.len() * 2) as u64;
        Self {
            samples,
            sample_rate,
            source_bytes,
        }
    }

    /// Override the recorded encoded size of the source input.
    pub fn with_source_bytes(mut self, source_bytes: u64) -> Self {
        self.source_bytes = source_bytes;
        self
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Encoded byte size of the original input.
    pub fn source_bytes(&self) -> u64 {
        self.source_bytes
    }

    /// Sample rate of the normalized buffer.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Span covering the whole timeline.
    pub fn full_span(&self) -> TimeSpan {
        TimeSpan::new(0, self.duration_ms())
    }

    /// Borrow the sample range for a span, clamped to the buffer.
    pub fn slice_samples(&self, span: TimeSpan) -> &[i16] {
        let start = self.index_at(span.start_ms);
        let end = self.index_at(span.end_ms).max(start);
        &self.samples[start..end]
    }

    /// Encode a span to WAV bytes for upload.
    pub fn wav_bytes(&self, span: TimeSpan) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| MinutierError::AudioEncode {
                message: format!("Failed to start WAV encode: {}", e),
            })?;
        for &sample in self.slice_samples(span) {
            writer
                .write_sample(sample)
                .map_err(|e| MinutierError::AudioEncode {
                    message: format!("Failed to encode WAV sample: {}", e),
                })?;
        }
        writer.finalize().map_err(|e| MinutierError::AudioEncode {
            message: format!("Failed to finalize WAV encode: {}", e),
        })?;
        Ok(cursor.into_inner())
    }

    /// Write the full normalized timeline to a WAV file.
    ///
    /// This is the uniform copy handed to the diarizer.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let bytes = self.wav_bytes(self.full_span())?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn index_at(&self, ms: u64) -> usize {
        let index = (ms * self.sample_rate as u64 / 1000) as usize;
        index.min(self.samples.len())
    }
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
