//! Bounded worker pool that fans transcription calls out over work units.
//!
//! Completion order is unconstrained; results land in a preallocated slot
//! array addressed by `WorkUnit.index`, so reassembly never depends on which
//! call finished first.

use crate::audio::timeline::Timeline;
use crate::error::{MinutierError, Result};
use crate::segment::WorkUnit;
use crate::stt::transcriber::Transcriber;
use crossbeam_channel::{bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Fixed-size pool of transcription workers.
pub struct TranscriptionPool {
    transcriber: Arc<dyn Transcriber>,
    workers: usize,
}

impl TranscriptionPool {
    /// Creates a pool over a transcription backend.
    pub fn new(transcriber: Arc<dyn Transcriber>, workers: usize) -> Self {
        Self {
            transcriber,
            workers: workers.max(1),
        }
    }

    /// Transcribe every unit and return the texts in index order.
    ///
    /// Each unit is submitted exactly once; excess units queue until a worker
    /// frees up. `on_progress` fires once per completed unit, in completion
    /// order, with a monotonically increasing done count against the original
    /// total. If any single call fails, the run fails as a whole: remaining
    /// queued units are drained without being transcribed, partial results
    /// are discarded, and the first error is returned. Retries are a caller
    /// concern.
    pub fn transcribe_all(
        &self,
        timeline: &Timeline,
        units: &[WorkUnit],
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<Vec<String>> {
        if units.is_empty() {
            return Ok(Vec::new());
        }

        let total = units.len();
        let worker_count = self.workers.min(total);

        let (work_tx, work_rx) = unbounded::<&WorkUnit>();
        for unit in units {
            if work_tx.send(unit).is_err() {
                break;
            }
        }
        drop(work_tx);

        let (done_tx, done_rx) = bounded::<(usize, Result<String>)>(total);
        let failed = AtomicBool::new(false);

        let mut slots: Vec<Option<String>> = vec![None; total];
        let mut done = 0usize;
        let mut first_error: Option<MinutierError> = None;

        thread::scope(|scope| {
            for _ in 0..worker_count {
                let work_rx = work_rx.clone();
                let done_tx = done_tx.clone();
                let transcriber = Arc::clone(&self.transcriber);
                let failed = &failed;
                scope.spawn(move || {
                    while let Ok(unit) = work_rx.recv() {
                        // After a failure the queue is drained, not transcribed.
                        if failed.load(Ordering::SeqCst) {
                            continue;
                        }
                        let result = timeline
                            .wav_bytes(unit.span)
                            .and_then(|wav| transcriber.transcribe(&wav));
                        if result.is_err() {
                            failed.store(true, Ordering::SeqCst);
                        }
                        if done_tx.send((unit.index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);
            drop(work_rx);

            // Single mutation point: one writer per slot, one counter.
            while let Ok((index, result)) = done_rx.recv() {
                match result {
                    Ok(text) => {
                        slots[index] = Some(text);
                        done += 1;
                        on_progress(done, total);
                    }
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }
        });

        if let Some(e) = first_error {
            return Err(e);
        }

        let mut texts = Vec::with_capacity(total);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(text) => texts.push(text),
                None => {
                    return Err(MinutierError::Transcription {
                        message: format!("unit {} completed without producing text", index),
                    });
                }
            }
        }
        Ok(texts)
    }
}
