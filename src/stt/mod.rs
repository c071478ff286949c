//! Speech-to-text: the transcription capability and the worker pool over it.

pub mod pool;
pub mod remote;
pub mod transcriber;

pub use pool::TranscriptionPool;
pub use remote::RemoteTranscriber;
pub use transcriber::{MockTranscriber, Transcriber};
