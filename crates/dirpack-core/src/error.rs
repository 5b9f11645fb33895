//! Error types for archive creation and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while archiving or unarchiving a directory tree.
///
/// Every error is terminal for the call that produced it. Output already
/// written to a sink, or files already materialized in a destination, are
/// left in place for the caller to clean up.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source directory does not exist.
    #[error("unable to archive files: source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Destination directory does not exist.
    #[error("unable to unarchive files: destination not found: {path}")]
    DestinationNotFound {
        /// The missing destination path.
        path: PathBuf,
    },

    /// Source or destination exists but is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// A path resolved outside its archive root.
    #[error("illegal file path: {path}")]
    IllegalPath {
        /// The path that escaped the root.
        path: PathBuf,
    },

    /// The input is not a well-formed tar stream.
    #[error("invalid archive: {0}")]
    InvalidArchive(#[source] std::io::Error),

    /// The compression envelope is missing or malformed.
    #[error("invalid compressed stream: {reason}")]
    InvalidCompression {
        /// Why the envelope was rejected.
        reason: String,
    },

    /// The ignore-pattern file could not be read.
    #[error("cannot read ignore file {path}: {source}")]
    IgnoreFile {
        /// Path of the pattern file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An ignore pattern could not be compiled.
    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Compression level outside the supported 0-9 range.
    #[error("invalid compression level {level}, expected 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl ArchiveError {
    /// Returns `true` if this error is a path-escape rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::IllegalPath {
    ///     path: PathBuf::from("/etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::InvalidCompressionLevel { level: 12 };
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::IllegalPath { .. })
    }

    /// Returns `true` if the call failed before any entry was processed
    /// because the source or destination was unusable.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::DestinationNotFound { .. }
                | Self::NotADirectory { .. }
        )
    }

    /// Returns `true` if the input stream itself was malformed.
    #[must_use]
    pub const fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidArchive(_) | Self::InvalidCompression { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    ///
    /// let err = ArchiveError::InvalidCompression {
    ///     reason: "missing gzip magic".to_string(),
    /// };
    /// assert_eq!(err.context(), Some("missing gzip magic"));
    ///
    /// let err = ArchiveError::InvalidCompressionLevel { level: 10 };
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidCompression { reason } | Self::InvalidPattern { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}
