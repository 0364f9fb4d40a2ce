//! Relay engine - one source, one tee, one envelope.
//!
//! A run moves through [`Stage::Open`], [`Stage::Streaming`],
//! [`Stage::Finalizing`] and ends in [`Stage::Closed`]. Any failure aborts the
//! run at the stage it happened in; nothing is retried. The source and the
//! envelope are owned by the run and dropped on every exit path, and an
//! aborted run never writes the terminating boundary.
//!
//! # Example
//!
//! ```
//! use teehash::{Relay, RelayConfig};
//!
//! let relay = Relay::new(RelayConfig::default().with_boundary("xyz"));
//! let mut out = Vec::new();
//! let report = relay.run("greeting.txt", &b"hello"[..], &mut out)?;
//!
//! assert_eq!(report.digest.to_hex(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
//! assert!(out.ends_with(b"\r\n--xyz--\r\n"));
//! # Ok::<(), teehash::RelayError>(())
//! ```

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, trace, warn};

use super::{RelayReport, Stage};
use crate::config::RelayConfig;
use crate::envelope::MultipartWriter;
use crate::error::{RelayError, Result};
use crate::hash::Accumulator;
use crate::tee::TeeReader;

/// Relays a byte source into a multipart envelope, hashing it on the way.
///
/// The envelope gets two parts: the body under the configured file field, then
/// the hex digest under the digest field.
#[derive(Debug, Clone, Default)]
pub struct Relay {
    config: RelayConfig,
}

impl Relay {
    /// Creates a relay with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relays the file at `path` into `out`.
    ///
    /// The `filename` parameter of the body part is the final path component.
    /// If the file cannot be opened or is a directory, [`RelayError::SourceOpen`]
    /// is returned and nothing is written to `out`.
    pub fn run_path<W: Write>(&self, path: impl AsRef<Path>, out: W) -> Result<RelayReport> {
        let path = path.as_ref();
        self.config.validate()?;

        debug!(stage = %Stage::Open, path = %path.display(), "opening source");
        let source_open = |source| RelayError::SourceOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(source_open)?;
        if file.metadata().map_err(source_open)?.is_dir() {
            return Err(source_open(io::Error::new(
                ErrorKind::IsADirectory,
                "source is a directory",
            )));
        }

        self.run(&display_name(path), file, out)
    }

    /// Relays `source` into `out` using the configured digest algorithm.
    pub fn run<R: Read, W: Write>(&self, filename: &str, source: R, out: W) -> Result<RelayReport> {
        self.run_with(filename, source, self.config.algorithm().accumulator(), out)
    }

    /// Relays `source` into `out`, feeding `accumulator`.
    ///
    /// The digest field carries whatever digest `accumulator` produces.
    pub fn run_with<R, A, W>(
        &self,
        filename: &str,
        source: R,
        accumulator: A,
        out: W,
    ) -> Result<RelayReport>
    where
        R: Read,
        A: Accumulator,
        W: Write,
    {
        self.config.validate()?;

        let result = self.relay(filename, source, accumulator, out);
        match &result {
            Ok(report) => debug!(
                stage = %Stage::Closed,
                filename,
                bytes = report.bytes,
                digest = %report.digest,
                "relay complete"
            ),
            Err(err) => warn!(stage = %Stage::Closed, filename, error = %err, "relay aborted"),
        }
        result
    }

    fn relay<R, A, W>(&self, filename: &str, source: R, accumulator: A, out: W) -> Result<RelayReport>
    where
        R: Read,
        A: Accumulator,
        W: Write,
    {
        let mut envelope = match self.config.boundary() {
            Some(boundary) => MultipartWriter::with_boundary(out, boundary)?,
            None => MultipartWriter::new(out),
        };
        let mut tee = TeeReader::new(source, accumulator);

        debug!(
            stage = %Stage::Streaming,
            filename,
            boundary = envelope.boundary(),
            "streaming body"
        );
        {
            let mut part = envelope.create_form_file(self.config.file_field(), filename)?;
            for chunk in tee.chunks(self.config.read_size()) {
                let chunk = chunk?;
                trace!(len = chunk.len(), "relaying chunk");
                part.write_all(&chunk).map_err(RelayError::write_body)?;
            }
        }

        let bytes = tee.observed();
        debug!(stage = %Stage::Finalizing, filename, bytes, "finalizing digest");
        let digest = tee.finalize()?;

        envelope.write_field(self.config.digest_field(), &digest.to_hex())?;
        let boundary = envelope.boundary().to_string();
        envelope.finish()?;

        Ok(RelayReport {
            filename: filename.to_string(),
            bytes,
            digest,
            boundary,
        })
    }
}

/// Final path component, or the whole path when there is none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
