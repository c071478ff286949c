use crate::error::{MinutierError, Result};

/// Trait for live audio capture devices.
///
/// This trait allows swapping implementations (real capture backend vs mock).
/// A backend delivers 16-bit PCM at the pipeline's normalized rate; an empty
/// read from a finite source signals exhaustion.
pub trait AudioSource: Send {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read the next batch of captured samples.
    ///
    /// # Returns
    /// Vector of 16-bit PCM audio samples; empty when nothing new is buffered.
    fn read_samples(&mut self) -> Result<Vec<i16>>;
}

/// Mock audio source for testing.
///
/// Delivers its configured samples in fixed-size batches, then empty reads.
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    samples: Vec<i16>,
    position: usize,
    batch_size: usize,
    should_fail_start: bool,
    should_fail_read: bool,
}

impl MockAudioSource {
    /// Create a new mock audio source with default settings.
    pub fn new() -> Self {
        Self {
            is_started: false,
            samples: vec![0i16; 160],
            position: 0,
            batch_size: 160,
            should_fail_start: false,
            should_fail_read: false,
        }
    }

    /// Configure the mock to deliver specific samples.
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.samples = samples;
        self
    }

    /// Configure the batch size returned by each read.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read.
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            return Err(MinutierError::AudioCapture {
                message: "mock start failure".to_string(),
            });
        }
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        if self.should_fail_read {
            return Err(MinutierError::AudioCapture {
                message: "mock read failure".to_string(),
            });
        }
        if !self.is_started || self.position >= self.samples.len() {
            return Ok(Vec::new());
        }
        let end = (self.position + self.batch_size).min(self.samples.len());
        let batch = self.samples[self.position..end].to_vec();
        self.position = end;
        Ok(batch)
    }
}
