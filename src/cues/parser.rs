//! Caption cue scanning.
//!
//! Cues are consumed in document order; document order defines chronological
//! order and no independent sort is applied. Only the two-timestamp /
//! speaker-tag block shape is recognized, nothing else of the caption format.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::timecode::TimeCode;

/// One caption entry: a time range plus the speaker label below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Start of the cue.
    pub start: TimeCode,
    /// End of the cue.
    pub end: TimeCode,
    /// Opaque speaker label (alphanumeric/underscore).
    pub speaker: String,
}

// Pattern is hardcoded and known to be valid
#[allow(clippy::expect_used)]
static CUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2}\.\d{0,3}) --> (\d{2}:\d{2}\.\d{0,3})\r?\n\[([A-Za-z0-9_]+)\]")
        .expect("valid cue pattern")
});

/// Scan caption text for speaker-labeled cues.
///
/// # Errors
///
/// Returns an error if a matched time code does not parse or if a cue ends
/// before it starts. Text without any matching block yields an empty list.
pub fn parse_cues(text: &str) -> Result<Vec<Cue>> {
    let mut cues = Vec::new();

    for captures in CUE_PATTERN.captures_iter(text) {
        let start = TimeCode::parse(&captures[1])?;
        let end = TimeCode::parse(&captures[2])?;
        if start > end {
            return Err(Error::InvalidCue {
                message: format!("cue for [{}] ends ({end}) before it starts ({start})", &captures[3]),
            });
        }
        cues.push(Cue {
            start,
            end,
            speaker: captures[3].to_string(),
        });
    }

    Ok(cues)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_cue() {
        let text = "WEBVTT\n\n00:00.000 --> 00:01.500\n[alice]\nHello there.\n";
        let cues = parse_cues(text).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].speaker, "alice");
        assert_eq!(cues[0].start, TimeCode::ZERO);
        assert_eq!(cues[0].end.as_millis(), 1_500);
    }

    #[test]
    fn test_parse_preserves_document_order() {
        let text = "00:03.000 --> 00:04.000\n[bob]\n\n00:00.000 --> 00:01.000\n[alice]\n";
        let cues = parse_cues(text).unwrap();
        assert_eq!(cues[0].speaker, "bob");
        assert_eq!(cues[1].speaker, "alice");
    }

    #[test]
    fn test_parse_accepts_crlf() {
        let text = "00:00.000 --> 00:01.000\r\n[speaker_1]\r\n";
        let cues = parse_cues(text).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].speaker, "speaker_1");
    }

    #[test]
    fn test_parse_short_fraction() {
        let text = "00:00.5 --> 00:01.75\n[alice]\n";
        let cues = parse_cues(text).unwrap();
        assert_eq!(cues[0].start.as_millis(), 500);
        assert_eq!(cues[0].end.as_millis(), 1_750);
    }

    #[test]
    fn test_parse_ignores_unlabeled_blocks() {
        let text = "00:00.000 --> 00:01.000\nno speaker tag here\n\n00:01.000 --> 00:02.000\n[alice]\n";
        let cues = parse_cues(text).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].speaker, "alice");
    }

    #[test]
    fn test_parse_rejects_reversed_cue() {
        let text = "00:05.000 --> 00:01.000\n[alice]\n";
        assert!(matches!(parse_cues(text), Err(Error::InvalidCue { .. })));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_cues("").unwrap().is_empty());
        assert!(parse_cues("WEBVTT\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_zero_length_cue_is_valid() {
        let text = "00:01.000 --> 00:01.000\n[alice]\n";
        let cues = parse_cues(text).unwrap();
        assert_eq!(cues[0].start, cues[0].end);
    }
}
