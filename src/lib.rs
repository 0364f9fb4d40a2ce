//! teehash
//!
//! Single-pass tee-and-hash relay for Rust.
//!
//! `teehash` streams a byte source into a `multipart/form-data` envelope while
//! feeding the same bytes to a digest accumulator, then attaches the digest as
//! a trailing field. The source is read exactly once and never buffered whole.
//!
//! The crate intentionally:
//! - does NOT retry anything
//! - does NOT spawn threads or run async I/O
//! - does NOT treat partial output as success
//!
//! It only does one thing: **Read bytes → tee into hash → envelope out**
//!
//! # Relay a file
//!
//! ```no_run
//! use std::io;
//! use teehash::{Relay, RelayConfig, RelayError};
//!
//! fn main() -> Result<(), RelayError> {
//!     let relay = Relay::new(RelayConfig::default());
//!     let report = relay.run_path("data.json", io::stdout().lock())?;
//!     eprintln!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! # Compose the pieces
//!
//! ```
//! use std::io::Write;
//! use teehash::{MultipartWriter, Sha1Accumulator, TeeReader};
//!
//! let mut envelope = MultipartWriter::with_boundary(Vec::new(), "b")?;
//! let mut tee = TeeReader::new(&b"hello"[..], Sha1Accumulator::new());
//!
//! let mut part = envelope.create_form_file("file", "hello.txt")?;
//! for chunk in tee.chunks(4) {
//!     part.write_all(&chunk?)?;
//! }
//! drop(part);
//!
//! let digest = tee.finalize()?;
//! envelope.write_field("sha1", &digest.to_hex())?;
//! let out = envelope.finish()?;
//! assert!(out.ends_with(b"\r\n--b--\r\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod envelope;
mod error;
mod hash;
mod relay;
mod tee;

mod buffer; // internal (thread-local reuse)

//
// Public surface
//

pub use config::{DEFAULT_FILE_FIELD, DEFAULT_READ_SIZE, MAX_READ_SIZE, RelayConfig};
pub use envelope::{
    MAX_BOUNDARY_LEN, MultipartWriter, PartWriter, form_data_content_type, random_boundary,
    validate_boundary,
};
pub use error::{RelayError, Result};
pub use hash::{Accumulator, Digest, DigestAlgorithm, Sha1Accumulator};
pub use relay::{Relay, RelayReport, Stage};
pub use tee::{Chunks, TeeReader};

#[cfg(feature = "hash-blake3")]
pub use hash::Blake3Accumulator;
