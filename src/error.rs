//! Error types for voxsplit.

/// Result type alias for voxsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for voxsplit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Required positional arguments were not provided.
    #[error("expected <captions_dir> and <video_file> arguments")]
    MissingArguments,

    /// Caption file for the video is absent.
    #[error("caption file not found: {path}")]
    CaptionFileNotFound {
        /// Expected path to the caption file.
        path: std::path::PathBuf,
    },

    /// Failed to read the caption file.
    #[error("failed to read caption file '{path}'")]
    CaptionRead {
        /// Path to the caption file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Time code text does not match `MM:SS.mmm`.
    #[error("malformed time code: '{text}' (expected MM:SS.mmm)")]
    MalformedTimeCode {
        /// The offending text.
        text: String,
    },

    /// Scale factor is not usable for time code arithmetic.
    #[error("invalid time scale factor: {factor}")]
    InvalidTimeScale {
        /// The offending factor.
        factor: f64,
    },

    /// A caption cue violates the start <= end invariant.
    #[error("invalid cue: {message}")]
    InvalidCue {
        /// Description of the violation.
        message: String,
    },

    /// Failed to create an output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreate {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// External media tool could not be started.
    #[error("failed to spawn '{program}'")]
    ToolSpawn {
        /// Name of the external program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// External media tool exceeded its deadline and was killed.
    #[error("'{program}' did not finish within {secs}s and was killed")]
    ToolTimedOut {
        /// Name of the external program.
        program: String,
        /// Deadline in seconds.
        secs: u64,
    },

    /// Clip extraction reported a non-zero exit status.
    #[error("extraction failed for '{destination}': {detail}")]
    ExtractionFailed {
        /// Destination clip path.
        destination: std::path::PathBuf,
        /// Diagnostic output from the external tool.
        detail: String,
    },

    /// Clip concatenation reported a non-zero exit status.
    #[error("concatenation failed for '{output}': {detail}")]
    ConcatenationFailed {
        /// Final track path.
        output: std::path::PathBuf,
        /// Diagnostic output from the external tool.
        detail: String,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
