//! Batcher Error Types
//!
//! This module defines the [`BatcherError`] enum, which covers every failure that can occur while
//! discovering, decoding, transforming, batching and exporting student responses.
//!
//! # Usage
//!
//! Use [`BatcherError`] as the error type for any fallible step of the batching pipeline. Decode and
//! transform failures are usually absorbed by the batching engine (see [`crate::engine`]); the other
//! variants propagate to the caller.
//!
//! # Example
//!
//! ```rust
//! use batcher::error::BatcherError;
//!
//! fn require_extension(ext: &str) -> Result<(), BatcherError> {
//!     if ext.is_empty() {
//!         return Err(BatcherError::InvalidLayout("file has no extension".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Represents all error types that can occur in the batcher.
#[derive(Debug, Error)]
pub enum BatcherError {
    /// A submitted file carries an extension no datatype is registered for.
    #[error("unknown file extension `{0}`")]
    UnknownExtension(String),
    /// A response references a datatype id that is not in the registry.
    #[error("unknown datatype id {0}")]
    UnknownDatatype(i64),
    /// I/O error (file not found, unreadable, etc.).
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A numeric response file could not be parsed into a matrix.
    #[error("malformed numeric file {}: {reason}", .path.display())]
    MalformedNumeric { path: PathBuf, reason: String },
    /// The submissions directory does not follow `<assignment>/<student_id>/<var>.<ext>`.
    #[error("invalid submission layout: {0}")]
    InvalidLayout(String),
    /// The preprocessing script could not be compiled.
    #[error("transform `{name}` failed to compile: {reason}")]
    TransformCompile { name: String, reason: String },
    /// The preprocessing script raised an error or returned an unusable value.
    #[error("transform `{name}` failed for student {student_id}: {reason}")]
    TransformFailed {
        name: String,
        student_id: i64,
        reason: String,
    },
    /// The same student has more than one graded response for a question.
    #[error("student {student_id} has more than one graded response for question `{question}`")]
    DuplicateEntry { student_id: i64, question: String },
    /// Writing the grades table or feedback documents failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl BatcherError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BatcherError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for BatcherError {
    fn from(err: csv::Error) -> Self {
        BatcherError::Export(err.to_string())
    }
}
