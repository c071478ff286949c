//! Work-unit planning: how a timeline is partitioned for transcription.

use crate::audio::timeline::{TimeSpan, Timeline};
use crate::defaults;
use crate::diarize::SpeakerTurn;

/// One indexed, independently transcribable slice of the timeline.
///
/// `index` is the unit's position in the final ordered transcript; it is the
/// single invariant that makes out-of-order completion reassemble correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub index: usize,
    pub span: TimeSpan,
    pub speaker: Option<String>,
}

/// Size and duration bounds for work-unit planning.
#[derive(Debug, Clone)]
pub struct SegmentPolicy {
    /// Maximum encoded input size transcribable as a single unit.
    pub max_upload_bytes: u64,
    /// Chunk duration used when the input exceeds the size bound.
    pub chunk_ms: u64,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        Self {
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            chunk_ms: defaults::CHUNK_MS,
        }
    }
}

/// Plan the ordered work units covering a timeline.
///
/// With speaker turns, each turn becomes exactly one labeled unit (turns are
/// already within the upload size limit). Without turns, the whole timeline
/// is one unit when its encoded size fits the bound; otherwise it is split
/// into fixed-length chunks with no speaker labels. Indices are assigned in
/// timeline order starting at 0.
pub fn plan_units(
    timeline: &Timeline,
    turns: Option<&[SpeakerTurn]>,
    policy: &SegmentPolicy,
) -> Vec<WorkUnit> {
    if let Some(turns) = turns {
        return turns
            .iter()
            .enumerate()
            .map(|(index, turn)| WorkUnit {
                index,
                span: TimeSpan::new(turn.start_ms, turn.end_ms),
                speaker: turn.speaker.clone(),
            })
            .collect();
    }

    if timeline.source_bytes() <= policy.max_upload_bytes {
        return vec![WorkUnit {
            index: 0,
            span: timeline.full_span(),
            speaker: None,
        }];
    }

    let duration_ms = timeline.duration_ms();
    let count = duration_ms.div_ceil(policy.chunk_ms).max(1);
    (0..count)
        .map(|i| {
            let start_ms = i * policy.chunk_ms;
            let end_ms = (start_ms + policy.chunk_ms).min(duration_ms);
            WorkUnit {
                index: i as usize,
                span: TimeSpan::new(start_ms, end_ms),
                speaker: None,
            }
        })
        .collect()
}
