//! Error types for the parsing module.
//!
//! Parse failures are expected in normal operation: a notification can
//! arrive for a file that has already vanished, or for one that is still
//! being written. Callers decide which variants are benign.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for functions that can fail during parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Things that can go wrong when parsing a delimited-text file.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Couldn't read the file from disk. Usually a race: the file was
    /// deleted or renamed between the notification and the read.
    #[error("failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no content to parse: zero bytes, or only blank
    /// lines. A file mid-write often looks like this.
    #[error("file has no parseable content: '{0}'")]
    Empty(PathBuf),

    /// A data record is wider than the header. Narrower records are
    /// padded; wider ones have no column to land in.
    #[error("record {row} in '{path}' has {found} fields, header has {expected}")]
    Ragged {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The CSV reader itself rejected the content (bad UTF-8, broken
    /// quoting).
    #[error("malformed content in '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ParseError {
    /// Creates an IO error with the path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that a lagging mirror should swallow rather
    /// than surface: the next notification for the path, if any, will
    /// retry naturally.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Empty(_))
    }
}
