//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Split a video's audio into per-speaker tracks using caption cues.
#[derive(Debug, Parser)]
#[command(name = "voxsplit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the caption file; output is written here too.
    pub captions_dir: Option<PathBuf>,

    /// Video file whose audio track is split.
    pub video: Option<PathBuf>,

    /// Common options for the split operation.
    #[command(flatten)]
    pub split: SplitArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Options for the split operation.
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Number of parallel extraction workers.
    #[arg(short, long, env = "VOXSPLIT_JOBS")]
    pub jobs: Option<usize>,

    /// Deadline per external tool call in seconds (0 disables).
    #[arg(long, env = "VOXSPLIT_TIMEOUT")]
    pub timeout: Option<u64>,

    /// ffmpeg binary to invoke.
    #[arg(long, env = "VOXSPLIT_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// Emit a JSON run summary on stdout.
    #[arg(long)]
    pub json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
