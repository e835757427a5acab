use thiserror::Error;

/// Everything that can go wrong between reading the input file and writing the last output.
#[derive(Debug, Error)]
pub enum SilenceError {
    #[error("Malformed silence detector output: {0}")]
    MalformedDetectorOutput(String),
    #[error("Could not determine a positive duration for `{0}`.")]
    InvalidDuration(String),
    #[error("The entire file is classified as silence, so there is no audio to keep. Try a lower noise threshold.")]
    EntireFileSilent,
    #[error("--normalize requires --execute: preview mode does not write a file that could be normalized.")]
    NormalizeWithoutExecute,
    #[error("`{0}` command not found. Please ensure it is installed and in your PATH.")]
    CommandNotFound(String),
    #[error("Failed to run `{0}`: {1}")]
    SubprocessFailure(String, String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{} of {} tracks could not be written:\n{}", .failures.len(), .total, .failures.join("\n"))]
    TrackWritesFailed { failures: Vec<String>, total: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T, E = SilenceError> = std::result::Result<T, E>;
