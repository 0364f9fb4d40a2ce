//! The multipart envelope writer.

use std::io::{self, ErrorKind, Write};

use tracing::trace;

use super::boundary::{form_data_content_type, random_boundary, validate_boundary};
use crate::error::{RelayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    /// A write to the inner writer failed; output is truncated.
    Poisoned,
    Closed,
}

impl State {
    fn check(self) -> Result<()> {
        match self {
            State::Open => Ok(()),
            State::Poisoned => Err(RelayError::InvalidState {
                message: "envelope poisoned by an earlier write failure",
            }),
            State::Closed => Err(RelayError::InvalidState {
                message: "envelope already closed",
            }),
        }
    }
}

/// Writes a `multipart/form-data` envelope to an inner writer.
///
/// Parts are emitted in the order they are created. The envelope is only
/// well-formed after [`close`](Self::close) or [`finish`](Self::finish) has
/// written the terminating boundary.
///
/// A failed write to the inner writer poisons the envelope: every later part,
/// body write, and close fails with [`RelayError::InvalidState`], so truncated
/// output can never be terminated as if it were complete.
#[derive(Debug)]
pub struct MultipartWriter<W: Write> {
    inner: W,
    boundary: String,
    parts: usize,
    state: State,
}

impl<W: Write> MultipartWriter<W> {
    /// Creates an envelope with a random boundary.
    ///
    /// Nothing is written until the first part is created.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            boundary: random_boundary(),
            parts: 0,
            state: State::Open,
        }
    }

    /// Creates an envelope with a caller-chosen boundary.
    pub fn with_boundary(inner: W, boundary: impl Into<String>) -> Result<Self> {
        let boundary = boundary.into();
        validate_boundary(&boundary)?;
        Ok(Self {
            inner,
            boundary,
            parts: 0,
            state: State::Open,
        })
    }

    /// The boundary delimiting parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `Content-Type` header value for this envelope.
    pub fn content_type(&self) -> String {
        form_data_content_type(&self.boundary)
    }

    /// Number of parts begun so far.
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Returns true once a write to the inner writer has failed.
    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }

    /// Returns true once the terminating boundary has been written.
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Begins a file part and returns a writer for its body.
    pub fn create_form_file(&mut self, field: &str, filename: &str) -> Result<PartWriter<'_, W>> {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            escape_quotes(field),
            escape_quotes(filename)
        );
        self.create_part(&[
            ("Content-Disposition", disposition.as_str()),
            ("Content-Type", "application/octet-stream"),
        ])
    }

    /// Begins a plain form field and returns a writer for its value.
    pub fn create_form_field(&mut self, field: &str) -> Result<PartWriter<'_, W>> {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(field));
        self.create_part(&[("Content-Disposition", disposition.as_str())])
    }

    /// Writes a complete form field with a text value.
    pub fn write_field(&mut self, field: &str, value: &str) -> Result<()> {
        let mut part = self.create_form_field(field)?;
        part.write_all(value.as_bytes())
            .map_err(|source| RelayError::SinkWrite {
                op: "write field",
                source,
            })
    }

    /// Begins a part with the given headers, in order.
    ///
    /// Header names and values containing CR or LF are rejected with
    /// [`RelayError::InvalidHeader`] before anything is written.
    pub fn create_part(&mut self, headers: &[(&str, &str)]) -> Result<PartWriter<'_, W>> {
        self.state.check()?;
        for (key, value) in headers {
            if has_line_break(key) || has_line_break(value) {
                return Err(RelayError::InvalidHeader {
                    header: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let mut head = String::new();
        if self.parts > 0 {
            head.push_str("\r\n");
        }
        head.push_str("--");
        head.push_str(&self.boundary);
        head.push_str("\r\n");
        for (key, value) in headers {
            head.push_str(key);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        self.emit("write part header", head.as_bytes())?;
        self.parts += 1;
        trace!(part = self.parts, "multipart part started");

        Ok(PartWriter {
            envelope: self,
            written: 0,
        })
    }

    /// Writes the terminating boundary and flushes.
    ///
    /// Fails if the envelope is poisoned or already closed.
    pub fn close(&mut self) -> Result<()> {
        self.state.check()?;

        let tail = format!("\r\n--{}--\r\n", self.boundary);
        self.emit("write closing boundary", tail.as_bytes())?;
        if let Err(source) = self.inner.flush() {
            self.state = State::Poisoned;
            return Err(RelayError::SinkWrite { op: "flush", source });
        }

        self.state = State::Closed;
        trace!(parts = self.parts, "multipart envelope closed");
        Ok(())
    }

    /// Closes the envelope and returns the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        Ok(self.inner)
    }

    /// Returns the inner writer without closing the envelope.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn emit(&mut self, op: &'static str, bytes: &[u8]) -> Result<()> {
        if let Err(source) = self.inner.write_all(bytes) {
            self.state = State::Poisoned;
            return Err(RelayError::SinkWrite { op, source });
        }
        Ok(())
    }
}

/// Writer for the body of the most recently created part.
///
/// Holding a `PartWriter` borrows the envelope, so a part always ends before
/// the next one begins.
#[derive(Debug)]
pub struct PartWriter<'a, W: Write> {
    envelope: &'a mut MultipartWriter<W>,
    written: u64,
}

impl<W: Write> PartWriter<'_, W> {
    /// Body bytes written to this part.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Write for PartWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.envelope.state.check().map_err(io::Error::other)?;

        match self.envelope.inner.write(buf) {
            Ok(0) if !buf.is_empty() => {
                self.envelope.state = State::Poisoned;
                Ok(0)
            }
            Ok(n) => {
                self.written += n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => Err(e),
            Err(e) => {
                self.envelope.state = State::Poisoned;
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.envelope.state.check().map_err(io::Error::other)?;
        self.envelope.inner.flush().inspect_err(|_| {
            self.envelope.state = State::Poisoned;
        })
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `limit` bytes, then fails every write.
    struct Limited {
        out: Vec<u8>,
        limit: usize,
    }

    impl Write for Limited {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.out.len();
            if room == 0 {
                return Err(io::Error::other("disk full"));
            }
            let n = buf.len().min(room);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_exact_framing() {
        let mut envelope = MultipartWriter::with_boundary(Vec::new(), "BOUNDARY").unwrap();
        envelope
            .create_form_file("file", "data.json")
            .unwrap()
            .write_all(b"hello")
            .unwrap();
        envelope.write_field("sha1", "abc").unwrap();
        assert_eq!(envelope.parts(), 2);
        let out = envelope.finish().unwrap();

        let expected = "--BOUNDARY\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"data.json\"\r\n\
            Content-Type: application/octet-stream\r\n\
            \r\n\
            hello\r\n\
            --BOUNDARY\r\n\
            Content-Disposition: form-data; name=\"sha1\"\r\n\
            \r\n\
            abc\r\n\
            --BOUNDARY--\r\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_nothing_written_before_first_part() {
        let envelope = MultipartWriter::new(Vec::new());
        assert_eq!(envelope.boundary().len(), 60);
        assert!(envelope.into_inner().is_empty());
    }

    #[test]
    fn test_invalid_boundary_rejected() {
        let err = MultipartWriter::with_boundary(Vec::new(), "bad;boundary").unwrap_err();
        assert!(matches!(err, RelayError::InvalidBoundary { .. }));
    }

    #[test]
    fn test_content_type() {
        let envelope = MultipartWriter::with_boundary(Vec::new(), "abc").unwrap();
        assert_eq!(envelope.content_type(), "multipart/form-data; boundary=abc");

        let envelope = MultipartWriter::with_boundary(Vec::new(), "a:b").unwrap();
        assert_eq!(envelope.content_type(), "multipart/form-data; boundary=\"a:b\"");
    }

    #[test]
    fn test_names_are_escaped() {
        let mut envelope = MultipartWriter::with_boundary(Vec::new(), "b").unwrap();
        envelope.create_form_file("f\"x", "a\\b.txt").unwrap();
        let out = String::from_utf8(envelope.into_inner()).unwrap();
        assert!(out.contains(r#"name="f\"x"; filename="a\\b.txt""#));
    }

    #[test]
    fn test_line_breaks_in_headers_rejected() {
        let mut envelope = MultipartWriter::with_boundary(Vec::new(), "b").unwrap();
        assert!(matches!(
            envelope.create_form_file("file", "x\r\nX-Injected: yes"),
            Err(RelayError::InvalidHeader { .. })
        ));
        assert!(matches!(
            envelope.create_form_field("a\nb"),
            Err(RelayError::InvalidHeader { .. })
        ));
        assert!(matches!(
            envelope.create_part(&[("X-Bad\r", "v")]),
            Err(RelayError::InvalidHeader { .. })
        ));

        // Nothing written, envelope still usable
        assert_eq!(envelope.parts(), 0);
        assert!(!envelope.is_poisoned());
        envelope.write_field("k", "v").unwrap();
        let out = String::from_utf8(envelope.finish().unwrap()).unwrap();
        assert!(out.starts_with("--b\r\n"));
        assert!(!out.contains("X-Injected"));
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut envelope = MultipartWriter::with_boundary(Vec::new(), "b").unwrap();
        envelope.write_field("k", "v").unwrap();
        envelope.close().unwrap();
        assert!(envelope.is_closed());

        assert!(matches!(
            envelope.write_field("late", "x"),
            Err(RelayError::InvalidState { .. })
        ));
        assert!(matches!(envelope.close(), Err(RelayError::InvalidState { .. })));
    }

    #[test]
    fn test_failed_body_write_poisons() {
        let sink = Limited {
            out: Vec::new(),
            limit: 128,
        };
        let mut envelope = MultipartWriter::with_boundary(sink, "b").unwrap();
        let mut part = envelope.create_form_file("file", "big.bin").unwrap();
        assert!(part.write_all(&[0u8; 1024]).is_err());
        drop(part);

        assert!(envelope.is_poisoned());
        assert!(envelope.write_field("sha1", "x").is_err());
        assert!(matches!(envelope.close(), Err(RelayError::InvalidState { .. })));

        let out = envelope.into_inner().out;
        assert!(!out.ends_with(b"--b--\r\n"));
    }

    #[test]
    fn test_failed_header_write_is_sink_error() {
        let sink = Limited {
            out: Vec::new(),
            limit: 4,
        };
        let mut envelope = MultipartWriter::with_boundary(sink, "b").unwrap();
        assert!(matches!(
            envelope.create_form_field("k"),
            Err(RelayError::SinkWrite {
                op: "write part header",
                ..
            })
        ));
        assert!(envelope.is_poisoned());
    }

    #[test]
    fn test_part_written_counter() {
        let mut envelope = MultipartWriter::with_boundary(Vec::new(), "b").unwrap();
        let mut part = envelope.create_form_file("file", "x").unwrap();
        part.write_all(b"abc").unwrap();
        part.write_all(b"de").unwrap();
        assert_eq!(part.written(), 5);
    }
}
