//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "voxsplit";

/// File extension of the caption file expected next to a video's base name.
pub const CAPTION_EXTENSION: &str = "vtt";

/// File extension for extracted clips and assembled speaker tracks.
pub const CLIP_EXTENSION: &str = "flac";

/// Default external media tool binary.
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Default deadline for a single external tool invocation, in seconds.
///
/// A hung ffmpeg process would otherwise occupy a worker slot indefinitely.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

/// Upper bound on concurrent extraction workers.
///
/// Each worker drives one ffmpeg process; more than this mostly contends
/// on disk I/O rather than finishing sooner.
pub const MAX_WORKERS: usize = 8;

/// Fallback worker count when available parallelism cannot be determined.
pub const FALLBACK_WORKERS: usize = 4;

/// Poll interval while waiting on an external tool process.
pub const TOOL_POLL_INTERVAL_MS: u64 = 100;
