//! Segment extraction scheduling.
//!
//! Realizes every merged segment as a clip file: bounded parallelism, one
//! blocking external call per task, skip-if-exists resume, and per-segment
//! failure isolation. The caller gets a report back instead of poking at
//! shared run state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::ProgressBar;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::codec::MediaCodec;
use crate::constants::CLIP_EXTENSION;
use crate::cues::Segment;
use crate::error::{Error, Result};
use crate::timecode::TimeCode;

/// A segment bound to its destination clip path.
#[derive(Debug, Clone)]
pub struct SegmentTask {
    /// The merged segment to extract.
    pub segment: Segment,
    /// Destination clip file.
    pub destination: PathBuf,
}

/// Clip file name for a segment starting at `start`.
///
/// The colon-stripped `MMSS.mmm` form is fixed width, so lexicographic
/// order of clip file names equals chronological order of start times.
/// Track assembly depends on that equivalence.
#[must_use]
pub fn clip_file_name(start: TimeCode) -> String {
    format!("{}.{CLIP_EXTENSION}", start.to_string().replace(':', ""))
}

/// The set of tasks to submit, plus how many destinations already existed.
#[derive(Debug)]
pub struct ExtractionPlan {
    /// Tasks whose destination does not exist yet.
    pub tasks: Vec<SegmentTask>,
    /// Segments skipped because their clip file already exists.
    pub skipped: usize,
}

/// Map segments to tasks, creating speaker directories and dropping any
/// segment whose clip file already exists.
///
/// The skip realizes resumability: after a fully successful run, a rerun
/// over the same inputs submits zero tasks.
///
/// # Errors
///
/// Returns an error if a speaker directory cannot be created.
pub fn plan_tasks(segments: &[Segment], output_root: &Path) -> Result<ExtractionPlan> {
    let mut tasks = Vec::new();
    let mut skipped = 0;

    for segment in segments {
        let speaker_dir = output_root.join(&segment.speaker);
        std::fs::create_dir_all(&speaker_dir).map_err(|e| Error::OutputDirCreate {
            path: speaker_dir.clone(),
            source: e,
        })?;

        let destination = speaker_dir.join(clip_file_name(segment.start));
        if destination.exists() {
            info!("clip already exists, skipping: {}", destination.display());
            skipped += 1;
            continue;
        }

        tasks.push(SegmentTask {
            segment: segment.clone(),
            destination,
        });
    }

    Ok(ExtractionPlan { tasks, skipped })
}

/// Identity and diagnostic for one failed extraction.
#[derive(Debug, Clone)]
pub struct SegmentFailure {
    /// Speaker the segment belongs to.
    pub speaker: String,
    /// Segment start time.
    pub start: TimeCode,
    /// Destination that was not produced.
    pub destination: PathBuf,
    /// Diagnostic detail from the external tool.
    pub detail: String,
}

/// Outcome of draining the full task set.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Tasks that produced their clip file.
    pub succeeded: usize,
    /// Tasks that failed, with identifying context.
    pub failures: Vec<SegmentFailure>,
}

impl ExtractionReport {
    /// Speakers with at least one failed segment.
    #[must_use]
    pub fn failed_speakers(&self) -> std::collections::HashSet<String> {
        self.failures.iter().map(|f| f.speaker.clone()).collect()
    }
}

/// Drain all tasks through a bounded worker pool and return once every one
/// of them has finished.
///
/// Submission order is segment order; completion order is unspecified. A
/// failed task never aborts its siblings and there is no run-wide abort.
/// `completed` is bumped exactly once per finished task, success or failure.
pub async fn run_extraction<C>(
    tasks: Vec<SegmentTask>,
    source: PathBuf,
    codec: Arc<C>,
    workers: usize,
    completed: Arc<AtomicU64>,
    progress: Option<ProgressBar>,
) -> ExtractionReport
where
    C: MediaCodec + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut join_set: JoinSet<std::result::Result<(), SegmentFailure>> = JoinSet::new();

    for task in tasks {
        let semaphore = Arc::clone(&semaphore);
        let codec = Arc::clone(&codec);
        let source = source.clone();
        let completed = Arc::clone(&completed);
        let progress = progress.clone();

        join_set.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    let offset = task.segment.start.saturating_sub(TimeCode::ZERO);
                    let duration = task.segment.end.saturating_sub(task.segment.start);
                    let destination = task.destination.clone();
                    tokio::task::spawn_blocking(move || {
                        codec.extract_clip(&source, offset, duration, &destination)
                    })
                    .await
                    .unwrap_or_else(|e| {
                        Err(Error::Internal {
                            message: format!("extraction task panicked: {e}"),
                        })
                    })
                }
                Err(e) => Err(Error::Internal {
                    message: format!("worker pool closed: {e}"),
                }),
            };

            completed.fetch_add(1, Ordering::Relaxed);
            if let Some(pb) = progress {
                pb.inc(1);
            }

            outcome.map_err(|e| SegmentFailure {
                speaker: task.segment.speaker.clone(),
                start: task.segment.start,
                destination: task.destination,
                detail: e.to_string(),
            })
        });
    }

    // Join barrier: assembly reads the filesystem state left behind here,
    // so every task must have finished before this returns.
    let mut report = ExtractionReport::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(())) => report.succeeded += 1,
            Ok(Err(failure)) => {
                warn!(
                    "extraction failed for [{}] at {}: {}",
                    failure.speaker, failure.start, failure.detail
                );
                report.failures.push(failure);
            }
            Err(e) => warn!("extraction task aborted: {e}"),
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cues::Segment;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn segment(start: &str, end: &str, speaker: &str) -> Segment {
        Segment {
            start: TimeCode::parse(start).unwrap(),
            end: TimeCode::parse(end).unwrap(),
            speaker: speaker.to_string(),
        }
    }

    /// Fake codec that writes marker files and records every call.
    #[derive(Default)]
    struct FakeCodec {
        calls: Mutex<Vec<PathBuf>>,
        fail_speakers: Vec<String>,
    }

    impl MediaCodec for FakeCodec {
        fn extract_clip(
            &self,
            _source: &Path,
            _start: TimeCode,
            duration: TimeCode,
            destination: &Path,
        ) -> crate::error::Result<()> {
            self.calls.lock().unwrap().push(destination.to_path_buf());
            let speaker = destination
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.fail_speakers.contains(&speaker) {
                return Err(Error::ExtractionFailed {
                    destination: destination.to_path_buf(),
                    detail: "exit status 1: simulated".to_string(),
                });
            }
            std::fs::write(destination, duration.to_string())?;
            Ok(())
        }

        fn concatenate(&self, _inputs: &[PathBuf], _output: &Path) -> crate::error::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_clip_file_name_strips_colons() {
        assert_eq!(
            clip_file_name(TimeCode::parse("01:23.450").unwrap()),
            "0123.450.flac"
        );
    }

    #[test]
    fn test_clip_file_name_sort_order_is_chronological() {
        let starts = ["00:00.000", "00:09.900", "00:10.000", "01:00.000", "10:00.000"];
        let mut names: Vec<String> = starts
            .iter()
            .map(|s| clip_file_name(TimeCode::parse(s).unwrap()))
            .collect();
        let chronological = names.clone();
        names.sort();
        assert_eq!(names, chronological);
    }

    #[test]
    fn test_plan_creates_speaker_directories() {
        let dir = TempDir::new().unwrap();
        let segments = vec![segment("00:00.000", "00:01.000", "alice")];

        let plan = plan_tasks(&segments, dir.path()).unwrap();

        assert_eq!(plan.tasks.len(), 1);
        assert!(dir.path().join("alice").is_dir());
    }

    #[test]
    fn test_plan_skips_existing_destination() {
        let dir = TempDir::new().unwrap();
        let segments = vec![
            segment("00:00.000", "00:01.000", "alice"),
            segment("00:01.000", "00:02.000", "bob"),
        ];

        let alice_dir = dir.path().join("alice");
        std::fs::create_dir_all(&alice_dir).unwrap();
        std::fs::write(alice_dir.join(clip_file_name(segments[0].start)), b"x").unwrap();

        let plan = plan_tasks(&segments, dir.path()).unwrap();

        assert_eq!(plan.skipped, 1);
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].segment.speaker, "bob");
    }

    #[tokio::test]
    async fn test_extraction_writes_all_clips() {
        let dir = TempDir::new().unwrap();
        let segments = vec![
            segment("00:00.000", "00:01.500", "alice"),
            segment("00:01.500", "00:03.000", "bob"),
            segment("00:03.000", "00:04.000", "alice"),
        ];
        let plan = plan_tasks(&segments, dir.path()).unwrap();
        let codec = Arc::new(FakeCodec::default());
        let completed = Arc::new(AtomicU64::new(0));

        let report = run_extraction(
            plan.tasks,
            PathBuf::from("video.mkv"),
            Arc::clone(&codec),
            2,
            Arc::clone(&completed),
            None,
        )
        .await;

        assert_eq!(report.succeeded, 3);
        assert!(report.failures.is_empty());
        assert_eq!(completed.load(Ordering::Relaxed), 3);
        assert_eq!(codec.calls.lock().unwrap().len(), 3);
        assert!(dir.path().join("alice").join("0000.000.flac").is_file());
        assert!(dir.path().join("bob").join("0001.500.flac").is_file());
        assert!(dir.path().join("alice").join("0003.000.flac").is_file());
    }

    #[tokio::test]
    async fn test_existing_clip_triggers_no_codec_call() {
        let dir = TempDir::new().unwrap();
        let segments = vec![segment("00:00.000", "00:01.000", "alice")];
        let alice_dir = dir.path().join("alice");
        std::fs::create_dir_all(&alice_dir).unwrap();
        std::fs::write(alice_dir.join("0000.000.flac"), b"done").unwrap();

        let plan = plan_tasks(&segments, dir.path()).unwrap();
        let codec = Arc::new(FakeCodec::default());
        let completed = Arc::new(AtomicU64::new(0));

        let report = run_extraction(
            plan.tasks,
            PathBuf::from("video.mkv"),
            Arc::clone(&codec),
            2,
            Arc::clone(&completed),
            None,
        )
        .await;

        assert_eq!(report.succeeded, 0);
        assert_eq!(completed.load(Ordering::Relaxed), 0);
        assert!(codec.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_segment() {
        let dir = TempDir::new().unwrap();
        let segments = vec![
            segment("00:00.000", "00:01.000", "alice"),
            segment("00:01.000", "00:02.000", "bob"),
            segment("00:02.000", "00:03.000", "alice"),
        ];
        let plan = plan_tasks(&segments, dir.path()).unwrap();
        let codec = Arc::new(FakeCodec {
            fail_speakers: vec!["bob".to_string()],
            ..FakeCodec::default()
        });
        let completed = Arc::new(AtomicU64::new(0));

        let report = run_extraction(
            plan.tasks,
            PathBuf::from("video.mkv"),
            codec,
            2,
            Arc::clone(&completed),
            None,
        )
        .await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].speaker, "bob");
        assert!(report.failures[0].detail.contains("simulated"));
        assert_eq!(completed.load(Ordering::Relaxed), 3);
        assert!(!dir.path().join("bob").join("0001.000.flac").exists());
        assert!(dir.path().join("alice").join("0000.000.flac").is_file());
        assert!(dir.path().join("alice").join("0002.000.flac").is_file());
        assert_eq!(
            report.failed_speakers(),
            std::collections::HashSet::from(["bob".to_string()])
        );
    }
}
