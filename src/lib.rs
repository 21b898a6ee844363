//! voxsplit - per-speaker audio track splitter.
//!
//! Splits a video's audio into per-speaker clips using the speaker-labeled
//! cues of its caption file, then reassembles each speaker's clips into one
//! continuous track. The actual decode/encode/concatenate work is done by
//! an external ffmpeg process.

#![warn(missing_docs)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod cues;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod timecode;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use cli::{Cli, Command, ConfigAction, SplitArgs};
use codec::FfmpegCodec;
use config::{Config, load_default_config};
use constants::{CAPTION_EXTENSION, FALLBACK_WORKERS, MAX_WORKERS};
use cues::merge_cues;
use output::{RunSummary, emit_summary, progress};
use pipeline::{assemble_tracks, plan_tasks, run_extraction};

pub use error::{Error, Result};

/// Main entry point for the voxsplit CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.split.verbose, cli.split.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let (Some(captions_dir), Some(video)) = (cli.captions_dir, cli.video) else {
        return Err(Error::MissingArguments);
    };

    let config = load_default_config()?;
    split_video(&captions_dir, &video, &cli.split, &config)
}

/// Run the full split pipeline for one video.
fn split_video(captions_dir: &Path, video: &Path, args: &SplitArgs, config: &Config) -> Result<()> {
    // Fatal input problems are detected here, before any file is written.
    let caption_file = caption_file_for(captions_dir, video);
    if !caption_file.exists() {
        return Err(Error::CaptionFileNotFound { path: caption_file });
    }
    let text = std::fs::read_to_string(&caption_file).map_err(|e| Error::CaptionRead {
        path: caption_file.clone(),
        source: e,
    })?;

    let cues = cues::parse_cues(&text)?;
    if cues.is_empty() {
        warn!("no speaker cues found in {}", caption_file.display());
        return Ok(());
    }
    let cue_count = cues.len();
    let segments = merge_cues(cues);
    info!("merged {cue_count} cue(s) into {} segment(s)", segments.len());

    let plan = plan_tasks(&segments, captions_dir)?;
    if plan.skipped > 0 {
        info!("{} clip(s) already present, resuming", plan.skipped);
    }

    let workers = worker_count(args.jobs.or(config.extraction.jobs));
    let timeout = resolve_timeout(args.timeout, config.ffmpeg.timeout_secs);
    let binary = args
        .ffmpeg
        .clone()
        .unwrap_or_else(|| config.ffmpeg.binary.clone());
    let codec = Arc::new(FfmpegCodec::new(binary, timeout));

    let progress_enabled = !args.quiet && !args.no_progress && !args.json;
    let bar = progress::create_clip_progress(plan.tasks.len(), progress_enabled);
    let completed = Arc::new(AtomicU64::new(0));

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("failed to create async runtime: {e}"),
    })?;

    info!(
        "extracting {} segment(s) with {workers} worker(s)",
        plan.tasks.len()
    );
    let extraction = runtime.block_on(run_extraction(
        plan.tasks,
        video.to_path_buf(),
        Arc::clone(&codec),
        workers,
        Arc::clone(&completed),
        bar.clone(),
    ));
    progress::finish_progress(bar, "extraction complete");

    let incomplete = extraction.failed_speakers();
    let assembly = runtime.block_on(assemble_tracks(
        captions_dir.to_path_buf(),
        codec,
        workers,
        &incomplete,
    ))?;

    info!(
        "complete: {} clip(s) extracted, {} skipped, {} failed; {} track(s) assembled, {} skipped, {} excluded, {} failed",
        extraction.succeeded,
        plan.skipped,
        extraction.failures.len(),
        assembly.assembled,
        assembly.skipped,
        assembly.excluded.len(),
        assembly.failures.len()
    );
    if !extraction.failures.is_empty() || !assembly.failures.is_empty() {
        warn!("run finished with failures; rerun to retry the missing outputs");
    }

    if args.json {
        emit_summary(&RunSummary::new(
            video,
            captions_dir,
            cue_count,
            segments.len(),
            plan.skipped,
            &extraction,
            &assembly,
        ));
    }

    Ok(())
}

/// Caption file named after the video's base name inside the captions
/// directory.
fn caption_file_for(captions_dir: &Path, video: &Path) -> PathBuf {
    let stem = video.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("video"),
        |s| s.to_string_lossy(),
    );
    captions_dir.join(format!("{stem}.{CAPTION_EXTENSION}"))
}

fn worker_count(requested: Option<usize>) -> usize {
    requested
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map_or(FALLBACK_WORKERS, std::num::NonZeroUsize::get)
        })
        .clamp(1, MAX_WORKERS)
}

fn resolve_timeout(cli_secs: Option<u64>, config_secs: u64) -> Option<Duration> {
    match cli_secs.unwrap_or(config_secs) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

#[allow(clippy::print_stdout)]
fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => match action {
            ConfigAction::Init => {
                let path = config::config_file_path()?;
                if path.exists() {
                    println!("Configuration file already exists: {}", path.display());
                } else {
                    let saved_path = config::save_default_config(&Config::default())?;
                    println!("Created configuration file: {}", saved_path.display());
                }
                Ok(())
            }
            ConfigAction::Show => {
                let config = load_default_config()?;
                println!("{config:#?}");
                Ok(())
            }
            ConfigAction::Path => {
                let path = config::config_file_path()?;
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_file_named_after_video_stem() {
        let path = caption_file_for(Path::new("/captions"), Path::new("/media/talk.mkv"));
        assert_eq!(path, PathBuf::from("/captions/talk.vtt"));
    }

    #[test]
    fn test_worker_count_respects_request_and_cap() {
        assert_eq!(worker_count(Some(3)), 3);
        assert_eq!(worker_count(Some(0)), 1);
        assert_eq!(worker_count(Some(1_000)), MAX_WORKERS);
        let auto = worker_count(None);
        assert!((1..=MAX_WORKERS).contains(&auto));
    }

    #[test]
    fn test_resolve_timeout_zero_disables() {
        assert_eq!(resolve_timeout(Some(0), 600), None);
        assert_eq!(resolve_timeout(None, 0), None);
        assert_eq!(
            resolve_timeout(None, 30),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            resolve_timeout(Some(5), 600),
            Some(Duration::from_secs(5))
        );
    }
}
