//! Source error types.

use thiserror::Error;

/// Errors that can occur while fetching a file from a question source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file does not exist in the source.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path tries to leave the source root.
    #[error("path escapes the source root: {0}")]
    InvalidPath(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {path}")]
    Status { status: u16, path: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A local I/O error occurred.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
