//! Speaker-labeled caption cues.
//!
//! This module provides functionality to scan caption text for
//! speaker-labeled cues and to merge consecutive same-speaker cues into
//! extraction segments.

mod merger;
mod parser;

pub use merger::{Segment, merge_cues};
pub use parser::{Cue, parse_cues};
