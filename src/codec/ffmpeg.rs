//! FFmpeg-backed media codec.
//!
//! Shells out to ffmpeg for clip extraction and concatenation. Stderr is
//! drained on a separate thread so a chatty process cannot deadlock on a
//! full pipe, and every invocation runs under an optional deadline.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants::{CLIP_EXTENSION, TOOL_POLL_INTERVAL_MS};
use crate::error::{Error, Result};
use crate::timecode::TimeCode;

use super::MediaCodec;

/// Invokes ffmpeg for extraction and concatenation.
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    binary: String,
    timeout: Option<Duration>,
}

impl FfmpegCodec {
    /// Create a codec using the given ffmpeg binary and per-call deadline.
    ///
    /// `timeout = None` disables the deadline; a hung process then blocks
    /// its worker slot until killed externally.
    #[must_use]
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn run(&self, cmd: &mut Command) -> Result<ToolOutput> {
        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::piped());
        debug!("running {cmd:?}");

        let mut child = cmd.spawn().map_err(|e| Error::ToolSpawn {
            program: self.binary.clone(),
            source: e,
        })?;

        let stderr_reader = drain_stderr(&mut child);
        let status = self.wait_with_deadline(&mut child)?;
        let stderr = stderr_reader
            .join()
            .unwrap_or_else(|_| String::from("(stderr reader panicked)"));

        Ok(ToolOutput { status, stderr })
    }

    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus> {
        let deadline = self.timeout.map(|t| Instant::now() + t);

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    child.kill()?;
                    child.wait()?;
                    return Err(Error::ToolTimedOut {
                        program: self.binary.clone(),
                        secs: self.timeout.map_or(0, |t| t.as_secs()),
                    });
                }
            }
            std::thread::sleep(Duration::from_millis(TOOL_POLL_INTERVAL_MS));
        }
    }
}

impl MediaCodec for FfmpegCodec {
    fn extract_clip(
        &self,
        source: &Path,
        start: TimeCode,
        duration: TimeCode,
        destination: &Path,
    ) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(source)
            .arg("-ss")
            .arg(start.to_string())
            .arg("-t")
            .arg(duration.to_string())
            .arg("-n")
            .arg(destination);

        let output = self.run(&mut cmd)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::ExtractionFailed {
                destination: destination.to_path_buf(),
                detail: output.diagnostic(),
            })
        }
    }

    fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let list = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("|");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(format!("concat:{list}"))
            .arg("-c:a")
            .arg(CLIP_EXTENSION)
            .arg("-n")
            .arg(output);

        let result = self.run(&mut cmd)?;
        if result.status.success() {
            Ok(())
        } else {
            Err(Error::ConcatenationFailed {
                output: output.to_path_buf(),
                detail: result.diagnostic(),
            })
        }
    }
}

struct ToolOutput {
    status: ExitStatus,
    stderr: String,
}

impl ToolOutput {
    fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit status {}", self.status)
        } else {
            format!("exit status {}: {stderr}", self.status)
        }
    }
}

fn drain_stderr(child: &mut Child) -> std::thread::JoinHandle<String> {
    let pipe = child.stderr.take();
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}
