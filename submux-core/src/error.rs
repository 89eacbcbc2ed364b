use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for submux
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("language '{0}' is not supported")]
    LanguageNotSupported(String),

    #[error("no video or subtitle files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    #[error("found {videos} video file(s) but {subtitles} subtitle file(s); counts must match")]
    PairCountMismatch { videos: usize, subtitles: usize },

    #[error("cancelled by user")]
    Cancelled,

    #[error("failed to create output directory '{}': {}", path.display(), source)]
    StagingFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("required external tool '{0}' was not found on PATH")]
    DependencyNotFound(String),

    #[error("failed to start dependency check for '{tool}': {source}")]
    DependencyCheck {
        tool: String,
        source: std::io::Error,
    },

    #[error("failed to initialize worker pool: {0}")]
    WorkerPool(String),

    #[error("{failed} of {total} merge job(s) failed")]
    MergeFailed { failed: usize, total: usize },
}

/// Result type for submux operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
