//! Errors raised while loading the dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a loading failure, used by hosts to pick
/// how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is missing or cannot be read.
    DataUnavailable,
    /// The file was read but its structure is not usable.
    DataMalformed,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset unavailable at {path:?}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset malformed: required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("dataset malformed at record {record}: {source}")]
    BadRecord {
        record: u64,
        #[source]
        source: csv::Error,
    },

    #[error("dataset malformed: could not read header row: {0}")]
    BadHeader(#[source] csv::Error),
}

impl DatasetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DatasetError::Unavailable { .. } => ErrorKind::DataUnavailable,
            DatasetError::MissingColumn { .. }
            | DatasetError::BadRecord { .. }
            | DatasetError::BadHeader(_) => ErrorKind::DataMalformed,
        }
    }

    /// Name of the offending column, when the failure is tied to one.
    pub fn column(&self) -> Option<&str> {
        match self {
            DatasetError::MissingColumn { column } => Some(column),
            _ => None,
        }
    }
}
