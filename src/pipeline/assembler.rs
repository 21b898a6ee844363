//! Per-speaker track assembly.
//!
//! Runs strictly after the extraction barrier: discovers speaker
//! directories, sorts their clip files, and concatenates each into a single
//! track. Different speakers' subtrees are disjoint, so assembly runs
//! concurrently across speakers with the same failure isolation as
//! extraction.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::codec::MediaCodec;
use crate::constants::CLIP_EXTENSION;
use crate::error::{Error, Result};

/// One speaker whose track could not be assembled.
#[derive(Debug, Clone)]
pub struct TrackFailure {
    /// Speaker label.
    pub speaker: String,
    /// Diagnostic detail.
    pub detail: String,
}

/// Outcome of assembling all speaker tracks.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    /// Tracks written in this run.
    pub assembled: usize,
    /// Speakers skipped because their track already exists or their
    /// directory holds no clips.
    pub skipped: usize,
    /// Speakers excluded because extraction left them incomplete.
    pub excluded: Vec<String>,
    /// Per-speaker concatenation failures.
    pub failures: Vec<TrackFailure>,
}

/// List speaker directories under the captions directory, sorted by name.
pub fn speaker_directories(root: &Path) -> Result<Vec<String>> {
    let mut speakers = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            speakers.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    speakers.sort();
    Ok(speakers)
}

/// List a speaker's clip files in chronological order.
///
/// Clip names encode the fixed-width, colon-stripped start time, so sorting
/// by file name is sorting by start time.
pub fn clip_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut clips = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_clip = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new(CLIP_EXTENSION)));
        if is_clip {
            clips.push(path);
        }
    }
    clips.sort();
    Ok(clips)
}

/// Concatenate every speaker's clips into `<root>/<speaker>.<ext>`.
///
/// Speakers in `incomplete` had failed segments and are excluded rather than
/// assembled into a silently truncated track. An already-existing track is
/// skipped, keeping reruns idempotent.
///
/// # Errors
///
/// Returns an error only if the captions directory itself cannot be listed;
/// per-speaker failures are recorded in the report.
pub async fn assemble_tracks<C>(
    root: PathBuf,
    codec: Arc<C>,
    workers: usize,
    incomplete: &HashSet<String>,
) -> Result<AssemblyReport>
where
    C: MediaCodec + Send + Sync + 'static,
{
    let mut report = AssemblyReport::default();
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut join_set: JoinSet<std::result::Result<(), TrackFailure>> = JoinSet::new();

    for speaker in speaker_directories(&root)? {
        if incomplete.contains(&speaker) {
            warn!("[{speaker}] had failed segments, not assembling a partial track");
            report.excluded.push(speaker);
            continue;
        }

        let output = root.join(format!("{speaker}.{CLIP_EXTENSION}"));
        if output.exists() {
            info!("track already exists, skipping: {}", output.display());
            report.skipped += 1;
            continue;
        }

        let clips = clip_files(&root.join(&speaker))?;
        if clips.is_empty() {
            warn!("[{speaker}] has no clips to assemble");
            report.skipped += 1;
            continue;
        }

        let semaphore = Arc::clone(&semaphore);
        let codec = Arc::clone(&codec);
        join_set.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    let job_output = output.clone();
                    tokio::task::spawn_blocking(move || codec.concatenate(&clips, &job_output))
                        .await
                        .unwrap_or_else(|e| {
                            Err(Error::Internal {
                                message: format!("assembly task panicked: {e}"),
                            })
                        })
                }
                Err(e) => Err(Error::Internal {
                    message: format!("worker pool closed: {e}"),
                }),
            };

            outcome.map_err(|e| TrackFailure {
                speaker,
                detail: e.to_string(),
            })
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(())) => report.assembled += 1,
            Ok(Err(failure)) => {
                warn!(
                    "track assembly failed for [{}]: {}",
                    failure.speaker, failure.detail
                );
                report.failures.push(failure);
            }
            Err(e) => warn!("assembly task aborted: {e}"),
        }
    }

    Ok(report)
}
