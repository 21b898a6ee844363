//! Cue merging.
//!
//! Coalesces maximal runs of consecutive same-speaker cues into segments.
//! The pass works directly on structured records; merged output is never
//! re-rendered as caption text and re-scanned, which would depend on exact
//! formatting.

use super::Cue;
use crate::timecode::TimeCode;

/// A maximal run of consecutive cues sharing one speaker, treated as one
/// extraction unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Start of the first cue in the run.
    pub start: TimeCode,
    /// End of the last cue in the run.
    pub end: TimeCode,
    /// The shared speaker label.
    pub speaker: String,
}

/// Merge consecutive same-speaker cues into segments.
///
/// Single linear pass: while the speaker repeats, the open segment's end is
/// extended; on a speaker change the open segment is emitted and a new one
/// opened. The still-open segment is always flushed at the end — without the
/// flush the last speaker's trailing run would be dropped.
#[must_use]
pub fn merge_cues(cues: Vec<Cue>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<Segment> = None;

    for cue in cues {
        match open {
            Some(ref mut segment) if segment.speaker == cue.speaker => {
                segment.end = cue.end;
            }
            _ => {
                if let Some(segment) = open.take() {
                    segments.push(segment);
                }
                open = Some(Segment {
                    start: cue.start,
                    end: cue.end,
                    speaker: cue.speaker,
                });
            }
        }
    }

    if let Some(segment) = open {
        segments.push(segment);
    }

    segments
}
