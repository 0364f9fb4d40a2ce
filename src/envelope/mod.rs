//! Multipart envelope output.
//!
//! - [`MultipartWriter`] - writes a `multipart/form-data` body part by part
//! - [`PartWriter`] - [`std::io::Write`] handle for the body of one part
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use teehash::MultipartWriter;
//!
//! let mut envelope = MultipartWriter::with_boundary(Vec::new(), "xyz")?;
//! envelope.create_form_file("file", "data.json")?.write_all(b"{}")?;
//! envelope.write_field("sha1", "9d2e8a3b")?;
//! let out = envelope.finish()?;
//!
//! assert!(out.ends_with(b"\r\n--xyz--\r\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod boundary;
mod writer;

pub use boundary::{MAX_BOUNDARY_LEN, form_data_content_type, random_boundary, validate_boundary};
pub use writer::{MultipartWriter, PartWriter};
