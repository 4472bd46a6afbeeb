//! Error types for history queries and report generation.

use std::io;

use thiserror::Error;

/// Errors surfaced while querying history or writing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A git subprocess exited unsuccessfully.
    #[error("{command} failed: {stderr}")]
    Git {
        /// The command line that was run
        command: String,
        /// Trimmed stderr output from git
        stderr: String,
    },

    /// The repository could not be located or opened.
    #[error("repository error: {0}")]
    Repository(#[from] git2::Error),

    /// Subprocess or file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Report serialization failure.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
