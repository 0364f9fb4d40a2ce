//! Finalized digest values.

use std::fmt;

use bytes::Bytes;

use super::DigestAlgorithm;

/// An immutable digest produced by an [`Accumulator`](super::Accumulator).
///
/// The byte length always equals `algorithm().output_len()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    bytes: Bytes,
}

impl Digest {
    pub(crate) fn new(algorithm: DigestAlgorithm, bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), algorithm.output_len());
        Self {
            algorithm,
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    /// Parses a hex digest for `algorithm`.
    ///
    /// Returns `None` if the string is not valid hex or has the wrong length.
    pub fn from_hex(algorithm: DigestAlgorithm, hex_str: &str) -> Option<Self> {
        let bytes = hex::decode(hex_str).ok()?;
        if bytes.len() != algorithm.output_len() {
            return None;
        }
        Some(Self {
            algorithm,
            bytes: Bytes::from(bytes),
        })
    }

    /// The algorithm that produced this digest.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Returns the digest as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Digest size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for digests of supported algorithms.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
