//! Error types for teehash.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while relaying a byte stream.
///
/// Every variant that wraps an [`io::Error`] also names the operation that
/// failed, so a diagnostic printed at the top level is enough to tell an open
/// failure from a mid-transfer one.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The byte source could not be opened.
    #[error("open {}: {source}", path.display())]
    SourceOpen {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// Reading from the source or writing the body failed mid-transfer.
    #[error("stream {op}: {source}")]
    StreamIo {
        /// The operation that failed (`"read"`, `"write body"`).
        op: &'static str,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// Writing a part header, a field, or the closing boundary failed.
    #[error("sink {op}: {source}")]
    SinkWrite {
        /// The operation that failed.
        op: &'static str,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// An operation was attempted in a state that does not allow it.
    #[error("invalid state: {message}")]
    InvalidState {
        /// What was attempted.
        message: &'static str,
    },

    /// A caller-supplied multipart boundary was rejected.
    #[error("invalid boundary {boundary:?}: {reason}")]
    InvalidBoundary {
        /// The rejected boundary.
        boundary: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A part header name or value cannot be written on a single header line.
    #[error("invalid header {header}: {value:?} contains a line break")]
    InvalidHeader {
        /// The header being written.
        header: String,
        /// The rejected value.
        value: String,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A digest algorithm name did not match any supported algorithm.
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl RelayError {
    /// Wraps a read failure.
    pub(crate) fn read(source: io::Error) -> Self {
        RelayError::StreamIo { op: "read", source }
    }

    /// Wraps a failure while writing part body bytes.
    pub(crate) fn write_body(source: io::Error) -> Self {
        RelayError::StreamIo {
            op: "write body",
            source,
        }
    }

    /// Returns true for errors raised before any output was produced.
    pub fn is_source_open(&self) -> bool {
        matches!(self, RelayError::SourceOpen { .. })
    }
}

/// Shorthand result type used throughout the crate.
pub type Result<T> = std::result::Result<T, RelayError>;
