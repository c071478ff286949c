//! Audio input: decoded timelines and live capture sources.

pub mod recorder;
pub mod timeline;

pub use recorder::{AudioSource, MockAudioSource};
pub use timeline::{TimeSpan, Timeline};
