use std::path::PathBuf;

use thiserror::Error;

use crate::reader::ReaderSeverity;

/// Convenience result type for reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Error type returned by [`crate::reader::TabularReader`] and the row access surface.
///
/// Field-count mismatches and missing keys are not errors: they surface as raw rows and `None`.
/// End of data is signaled by [`crate::reader::TabularReader::is_valid`] returning `false`.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The reader was configured with an unusable delimiter. Checked before any file access.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The path failed the readability probe done at construction.
    #[error("could not read provided file: {} ({source})", .path.display())]
    NotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening the file failed during the open sequence, after the readability probe passed
    /// (file removed or permissions changed in between).
    #[error("failed to open file: {} ({source})", .path.display())]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write or delete was attempted through the field access surface.
    #[error("data is read-only (attempted to modify field {key})")]
    ReadOnlyViolation { key: String },

    /// Record parsing failed while scanning or advancing.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O error (e.g. rewinding the stream).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    /// Severity used when reporting this error to a [`crate::reader::ReaderObserver`].
    ///
    /// Anything backed by the filesystem is `Critical`; configuration and contract errors are
    /// `Error`.
    pub fn severity(&self) -> ReaderSeverity {
        match self {
            ReaderError::NotReadable { .. } | ReaderError::OpenFailure { .. } | ReaderError::Io(_) => {
                ReaderSeverity::Critical
            }
            ReaderError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ReaderSeverity::Critical,
                _ => ReaderSeverity::Error,
            },
            ReaderError::InvalidConfiguration { .. } | ReaderError::ReadOnlyViolation { .. } => {
                ReaderSeverity::Error
            }
        }
    }
}
