//! The tee reader.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use teehash::{Sha1Accumulator, TeeReader};
//!
//! let mut tee = TeeReader::new(&b"hello"[..], Sha1Accumulator::new());
//! let mut body = Vec::new();
//! tee.read_to_end(&mut body)?;
//!
//! let digest = tee.finalize()?;
//! assert_eq!(body, b"hello");
//! assert_eq!(digest.to_hex(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{self, Read};

use super::Chunks;
use crate::error::Result;
use crate::hash::{Accumulator, Digest};

/// Streaming reader that hashes data as it passes through.
///
/// Every successful read forwards the bytes it produced to the accumulator
/// before returning them, so after any sequence of reads (including one that
/// ended in an error) the accumulator has seen exactly the bytes the caller
/// has, in the same order.
#[derive(Debug)]
pub struct TeeReader<R, A> {
    reader: R,
    accumulator: A,
    observed: u64,
}

impl<R, A> TeeReader<R, A> {
    /// Creates a new tee over `reader`.
    pub fn new(reader: R, accumulator: A) -> Self {
        Self {
            reader,
            accumulator,
            observed: 0,
        }
    }

    /// Bytes delivered to the accumulator so far.
    pub fn observed(&self) -> u64 {
        self.observed
    }

    /// Returns a reference to the accumulator.
    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }

    /// Splits the tee into its source and accumulator.
    pub fn into_parts(self) -> (R, A) {
        (self.reader, self.accumulator)
    }
}

impl<R: Read, A: Accumulator> TeeReader<R, A> {
    /// Returns an iterator that pulls chunks of up to `read_size` bytes.
    ///
    /// The iterator borrows the tee, so the accumulator can be finalized once
    /// iteration is done.
    pub fn chunks(&mut self, read_size: usize) -> Chunks<'_, R, A> {
        Chunks::new(self, read_size)
    }

    /// Consumes the tee and finalizes its accumulator.
    ///
    /// The source is dropped here.
    pub fn finalize(self) -> Result<Digest> {
        let (_reader, mut accumulator) = self.into_parts();
        accumulator.finalize()
    }
}

impl<R: Read, A: Accumulator> Read for TeeReader<R, A> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.accumulator
                .update(&buf[..n])
                .map_err(io::Error::other)?;
            self.observed += n as u64;
        }
        Ok(n)
    }
}
