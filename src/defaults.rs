//! Default policy constants for minutier.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Uniform audio sample rate in Hz.
///
/// Every input is normalized to 16kHz mono on load. 16kHz is the standard
/// for speech recognition and keeps upload sizes small.
pub const SAMPLE_RATE: u32 = 16_000;

/// Maximum encoded size accepted by the transcription service, in bytes.
///
/// 25 MiB is the upload ceiling of the Whisper-style transcription API.
/// Inputs at or below this size are transcribed as a single unit.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Fixed chunk duration used when an input must be split, in milliseconds.
///
/// Four minutes of normalized audio stays comfortably under
/// [`MAX_UPLOAD_BYTES`] while keeping the unit count low.
pub const CHUNK_MS: u64 = 4 * 60 * 1000;

/// Maximum input duration for which speaker diarization is attempted,
/// in milliseconds.
///
/// Diarization cost grows steeply with duration; beyond 10 minutes the
/// pipeline falls back to fixed-size chunking. A threshold of zero
/// disables diarization entirely.
pub const DIARIZATION_MAX_MS: u64 = 10 * 60 * 1000;

/// Number of concurrent transcription workers.
///
/// Transcription calls are network-bound; four in flight saturates the
/// service without tripping its rate limits.
pub const WORKER_COUNT: usize = 4;

/// Default transcription model identifier sent to the API.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default summarization model identifier sent to the API.
pub const SUMMARY_MODEL: &str = "gpt-4o";

/// Token budget for the generated meeting summary.
pub const SUMMARY_MAX_TOKENS: u32 = 1500;

/// Default base URL for the OpenAI-compatible API.
pub const API_BASE_URL: &str = "https://api.openai.com/v1";

/// HTTP timeout for a single API call, in seconds.
///
/// A four-minute chunk can take a while to transcribe server-side;
/// two minutes covers the worst case observed.
pub const HTTP_TIMEOUT_SECS: u64 = 120;

/// Buffer size of the progress event channel.
///
/// Bounded so a stalled consumer applies backpressure instead of
/// accumulating events without limit.
pub const EVENT_BUFFER: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_stays_under_upload_limit() {
        // A full chunk of normalized PCM must encode below the upload cap.
        let chunk_bytes = CHUNK_MS / 1000 * SAMPLE_RATE as u64 * 2;
        assert!(chunk_bytes < MAX_UPLOAD_BYTES);
    }

    #[test]
    fn diarization_window_covers_multiple_chunks() {
        assert!(DIARIZATION_MAX_MS >= CHUNK_MS);
    }
}
