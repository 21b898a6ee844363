//! External media tool invocation.
//!
//! The actual audio decode/encode/concatenate work is delegated to an
//! external tool invoked as a black box: it receives a start offset, a
//! duration, and an output path, and either produces the file or fails.

mod ffmpeg;

use std::path::{Path, PathBuf};

pub use ffmpeg::FfmpegCodec;

use crate::error::Result;
use crate::timecode::TimeCode;

/// The seam to the external media tool.
///
/// Implementations perform one blocking call per operation. Production uses
/// [`FfmpegCodec`]; tests substitute an in-process fake.
pub trait MediaCodec {
    /// Extract `duration` of audio starting at `start` from `source` into
    /// `destination`. Must not overwrite an existing destination.
    fn extract_clip(
        &self,
        source: &Path,
        start: TimeCode,
        duration: TimeCode,
        destination: &Path,
    ) -> Result<()>;

    /// Concatenate `inputs` in the given order into `output`.
    fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}
