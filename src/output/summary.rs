//! Machine-readable run summary.
//!
//! With `--json` the run emits one summary object on stdout, so voxsplit
//! can sit behind scripts and frontends without scraping log lines.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::pipeline::{AssemblyReport, ExtractionReport};

/// One recorded failure, for extraction or assembly.
#[derive(Debug, Serialize)]
pub struct FailureEntry {
    /// Speaker the failure belongs to.
    pub speaker: String,
    /// Segment start or track path the failure refers to.
    pub context: String,
    /// Diagnostic detail from the external tool.
    pub detail: String,
}

/// Summary of a complete split run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Source video file.
    pub video: PathBuf,
    /// Captions/output directory.
    pub captions_dir: PathBuf,
    /// Speaker cues found in the caption file.
    pub cues: usize,
    /// Merged segments derived from the cues.
    pub segments: usize,
    /// Clips extracted in this run.
    pub clips_extracted: usize,
    /// Clips skipped because they already existed.
    pub clips_skipped: usize,
    /// Per-segment extraction failures.
    pub extraction_failures: Vec<FailureEntry>,
    /// Tracks assembled in this run.
    pub tracks_assembled: usize,
    /// Tracks skipped (already present or no clips).
    pub tracks_skipped: usize,
    /// Speakers excluded from assembly after failed segments.
    pub speakers_excluded: Vec<String>,
    /// Per-speaker assembly failures.
    pub assembly_failures: Vec<FailureEntry>,
}

impl RunSummary {
    /// Assemble a summary from the two pipeline reports.
    #[must_use]
    pub fn new(
        video: &Path,
        captions_dir: &Path,
        cues: usize,
        segments: usize,
        clips_skipped: usize,
        extraction: &ExtractionReport,
        assembly: &AssemblyReport,
    ) -> Self {
        Self {
            video: video.to_path_buf(),
            captions_dir: captions_dir.to_path_buf(),
            cues,
            segments,
            clips_extracted: extraction.succeeded,
            clips_skipped,
            extraction_failures: extraction
                .failures
                .iter()
                .map(|f| FailureEntry {
                    speaker: f.speaker.clone(),
                    context: f.start.to_string(),
                    detail: f.detail.clone(),
                })
                .collect(),
            tracks_assembled: assembly.assembled,
            tracks_skipped: assembly.skipped,
            speakers_excluded: assembly.excluded.clone(),
            assembly_failures: assembly
                .failures
                .iter()
                .map(|f| FailureEntry {
                    speaker: f.speaker.clone(),
                    context: format!("{}.track", f.speaker),
                    detail: f.detail.clone(),
                })
                .collect(),
        }
    }
}

/// Print the summary as pretty JSON on stdout.
pub fn emit_summary(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("failed to serialize run summary: {e}"),
    }
}
