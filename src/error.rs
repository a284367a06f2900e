//! Centralized error types for emlShell.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the emlShell library.
#[derive(Error, Debug)]
pub enum EmlError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("EML file not found: {0}")]
    FileNotFound(PathBuf),

    /// The drop zone refused the file (wrong extension or too many files).
    #[error("File rejected by the drop zone: {0}")]
    Rejected(PathBuf),

    /// The source could not be parsed as an Internet message.
    #[error("Unable to parse message: {0}")]
    Parse(String),

    /// No attachment exists at the requested position.
    #[error("No attachment at position {0}")]
    AttachmentNotFound(usize),

    /// The View action is not offered for this attachment's content type.
    #[error("Attachment '{0}' cannot be viewed, only downloaded")]
    NotViewable(String),

    /// A `data:` URI was malformed or its payload was not valid base64.
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// The system viewer could not be launched.
    #[error("Could not open '{path}': {reason}")]
    Open { path: PathBuf, reason: String },
}

/// Convenience alias for `Result<T, EmlError>`.
pub type Result<T> = std::result::Result<T, EmlError>;

/// Helper to convert a bare `std::io::Error` together with a path.
impl EmlError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound(path);
        }
        Self::Io { path, source }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `EmlError`
/// when no path context is available (rare, prefer `EmlError::io`).
impl From<std::io::Error> for EmlError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
