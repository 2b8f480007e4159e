//! Error type for the codecs

use std::io;

use zonemat_core::{ErrorCategory, FormatError};

/// Errors returned by the stream codecs, file handles and OMX layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("matrix not found in container: {0}")]
    MatrixNotFound(String),

    #[error("zone mapping not found in container: {0}")]
    MappingNotFound(String),

    #[error("no matrices to write")]
    EmptyMatrixSet,

    #[error("unrecognised matrix file extension: {0}")]
    UnknownFormat(String),

    #[error("container error: {0}")]
    Container(String),
}

impl Error {
    /// Format-level error, if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Error::Format(err) => Some(err),
            _ => None,
        }
    }

    /// Error family, for callers that branch on kinds of failure
    ///
    /// I/O failures have no category.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Error::Format(err) => Some(err.category()),
            Error::Io(_) | Error::UnknownFormat(_) => None,
            Error::MatrixNotFound(_)
            | Error::MappingNotFound(_)
            | Error::EmptyMatrixSet
            | Error::Container(_) => Some(ErrorCategory::Container),
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;
