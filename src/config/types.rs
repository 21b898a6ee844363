//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FFMPEG_BINARY, DEFAULT_TOOL_TIMEOUT_SECS};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// External tool settings.
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
}

/// Extraction worker settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Worker count override (default: available parallelism, capped).
    pub jobs: Option<usize>,
}

/// External tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// ffmpeg binary name or path.
    pub binary: String,

    /// Deadline per tool invocation in seconds; 0 disables the deadline.
    pub timeout_secs: u64,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_FFMPEG_BINARY.to_string(),
            timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
        }
    }
}
