//! Run summary and stage types.

use std::fmt;

use crate::envelope::form_data_content_type;
use crate::hash::Digest;

/// Stages of a single relay run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Acquiring the source and seeding the accumulator.
    Open,
    /// Moving body bytes through the tee.
    Streaming,
    /// Writing the digest field and closing the envelope.
    Finalizing,
    /// Terminal: output complete or run aborted.
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Open => "open",
            Stage::Streaming => "streaming",
            Stage::Finalizing => "finalizing",
            Stage::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful relay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReport {
    /// File name placed in the body part's `filename` parameter.
    pub filename: String,
    /// Body bytes relayed.
    pub bytes: u64,
    /// Digest of the body.
    pub digest: Digest,
    /// Boundary used by the envelope.
    pub boundary: String,
}

impl RelayReport {
    /// `Content-Type` header value matching the written envelope.
    pub fn content_type(&self) -> String {
        form_data_content_type(&self.boundary)
    }
}

impl fmt::Display for RelayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes, {}={})",
            self.filename,
            self.bytes,
            self.digest.algorithm(),
            self.digest
        )
    }
}
