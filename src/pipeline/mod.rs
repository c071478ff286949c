//! Meeting-report pipeline: phase sequencing and the progress event stream.
//!
//! The pipeline runs its phases on one thread, connected to the driver by a
//! bounded crossbeam channel for backpressure.

pub mod event;
pub mod runner;

pub use event::{PhaseStatus, ProgressEvent};
pub use runner::{PipelineHandle, PipelineResult, ReportPipeline};
