//! Iterator view over a [`TeeReader`].

use std::io::{ErrorKind, Read};

use bytes::Bytes;

use super::TeeReader;
use crate::buffer::ReadBuffer;
use crate::error::{RelayError, Result};
use crate::hash::Accumulator;

/// An iterator that yields the chunks read through a [`TeeReader`].
///
/// Each chunk has already been delivered to the accumulator when it is
/// yielded. A read failure is yielded once as [`RelayError::StreamIo`] and
/// ends the iteration; interrupted reads are reissued.
///
/// Chunk sizes follow whatever the source returns, capped at `read_size`.
pub struct Chunks<'a, R, A> {
    tee: &'a mut TeeReader<R, A>,
    buffer: ReadBuffer,
    finished: bool,
}

impl<'a, R: Read, A: Accumulator> Chunks<'a, R, A> {
    pub(super) fn new(tee: &'a mut TeeReader<R, A>, read_size: usize) -> Self {
        Self {
            tee,
            buffer: ReadBuffer::take(read_size.max(1)),
            finished: false,
        }
    }
}

impl<R: Read, A: Accumulator> Iterator for Chunks<'_, R, A> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.tee.read(self.buffer.as_mut_slice()) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(n) => return Some(Ok(Bytes::copy_from_slice(self.buffer.filled(n)))),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(RelayError::read(e)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha1Accumulator;
    use std::io::{self, Cursor};

    /// Returns `Interrupted` on every other call.
    struct Flaky<R> {
        inner: R,
        toggle: bool,
    }

    impl<R: Read> Read for Flaky<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.toggle = !self.toggle;
            if self.toggle {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_chunks_cover_input() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
        let mut tee = TeeReader::new(Cursor::new(&data), Sha1Accumulator::new());

        let chunks: Vec<Bytes> = tee.chunks(64).collect::<Result<_>>().unwrap();

        assert!(chunks.iter().all(|c| c.len() <= 64));
        assert_eq!(chunks.concat(), data);
        assert_eq!(tee.observed(), 1000);
        assert_eq!(tee.finalize().unwrap(), Sha1Accumulator::digest(&data));
    }

    #[test]
    fn test_chunks_empty_source() {
        let mut tee = TeeReader::new(io::empty(), Sha1Accumulator::new());
        assert!(tee.chunks(8).next().is_none());
        assert_eq!(
            tee.finalize().unwrap().to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_interrupted_reads_are_reissued() {
        let source = Flaky {
            inner: Cursor::new(b"hello".to_vec()),
            toggle: false,
        };
        let mut tee = TeeReader::new(source, Sha1Accumulator::new());
        let body: Vec<Bytes> = tee.chunks(2).collect::<Result<_>>().unwrap();
        assert_eq!(body.concat(), b"hello");
    }

    #[test]
    fn test_read_error_ends_iteration() {
        let source = Cursor::new(b"abc".to_vec()).chain(FailingRead);
        let mut tee = TeeReader::new(source, Sha1Accumulator::new());
        let mut chunks = tee.chunks(16);

        assert_eq!(chunks.next().unwrap().unwrap(), Bytes::from_static(b"abc"));
        assert!(matches!(
            chunks.next(),
            Some(Err(RelayError::StreamIo { op: "read", .. }))
        ));
        assert!(chunks.next().is_none());
        drop(chunks);

        // Accumulator kept the partial state
        assert_eq!(tee.observed(), 3);
    }

    struct FailingRead;

    impl Read for FailingRead {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }
}
