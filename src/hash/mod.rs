//! Digest accumulators and digest values.
//!
//! - [`Accumulator`] - incremental hash state, finalized exactly once
//! - [`Sha1Accumulator`] - SHA-1 (always available)
//! - [`Blake3Accumulator`] - BLAKE3 (requires `hash-blake3` feature)
//! - [`DigestAlgorithm`] - algorithm selector used by configuration
//! - [`Digest`] - immutable finalized digest

#[cfg(feature = "hash-blake3")]
mod blake3;
mod sha1;
mod value;

use std::fmt;
use std::str::FromStr;

use crate::error::{RelayError, Result};

#[cfg(feature = "hash-blake3")]
pub use self::blake3::Blake3Accumulator;
pub use self::sha1::Sha1Accumulator;
pub use self::value::Digest;

pub(crate) const ALREADY_FINALIZED: RelayError = RelayError::InvalidState {
    message: "digest already finalized",
};

/// Running hash state fed by the tee.
///
/// `update` must be chunk-boundary invariant: `update(a); update(b)` leaves
/// the same state as `update(a ++ b)`.
///
/// `finalize` may be called once. A second call, or an `update` after
/// finalization, fails with [`RelayError::InvalidState`].
pub trait Accumulator {
    /// Algorithm this accumulator computes.
    fn algorithm(&self) -> DigestAlgorithm;

    /// Feeds more bytes into the running state.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Consumes the running state and returns the digest.
    fn finalize(&mut self) -> Result<Digest>;
}

impl<A: Accumulator + ?Sized> Accumulator for Box<A> {
    fn algorithm(&self) -> DigestAlgorithm {
        (**self).algorithm()
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        (**self).update(data)
    }

    fn finalize(&mut self) -> Result<Digest> {
        (**self).finalize()
    }
}

impl<A: Accumulator + ?Sized> Accumulator for &mut A {
    fn algorithm(&self) -> DigestAlgorithm {
        (**self).algorithm()
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        (**self).update(data)
    }

    fn finalize(&mut self) -> Result<Digest> {
        (**self).finalize()
    }
}

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    /// SHA-1, 20-byte output.
    #[default]
    Sha1,
    /// BLAKE3, 32-byte output.
    #[cfg(feature = "hash-blake3")]
    Blake3,
}

impl DigestAlgorithm {
    /// Lowercase algorithm name, also the default envelope field name.
    pub const fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            #[cfg(feature = "hash-blake3")]
            DigestAlgorithm::Blake3 => "blake3",
        }
    }

    /// Digest size in bytes.
    pub const fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            #[cfg(feature = "hash-blake3")]
            DigestAlgorithm::Blake3 => 32,
        }
    }

    /// Returns a fresh accumulator for this algorithm.
    pub fn accumulator(&self) -> Box<dyn Accumulator> {
        match self {
            DigestAlgorithm::Sha1 => Box::new(Sha1Accumulator::new()),
            #[cfg(feature = "hash-blake3")]
            DigestAlgorithm::Blake3 => Box::new(Blake3Accumulator::new()),
        }
    }

    /// Hashes `data` in one shot.
    pub fn digest(&self, data: &[u8]) -> Digest {
        match self {
            DigestAlgorithm::Sha1 => Sha1Accumulator::digest(data),
            #[cfg(feature = "hash-blake3")]
            DigestAlgorithm::Blake3 => Blake3Accumulator::digest(data),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            #[cfg(feature = "hash-blake3")]
            "blake3" => Ok(DigestAlgorithm::Blake3),
            _ => Err(RelayError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("sha1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert_eq!("SHA-1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!(matches!(
            "md5".parse::<DigestAlgorithm>(),
            Err(RelayError::UnknownAlgorithm(name)) if name == "md5"
        ));
    }

    #[test]
    #[cfg(feature = "hash-blake3")]
    fn test_parse_blake3() {
        let algorithm: DigestAlgorithm = "Blake3".parse().unwrap();
        assert_eq!(algorithm, DigestAlgorithm::Blake3);
        assert_eq!(algorithm.to_string(), "blake3");
        assert_eq!(algorithm.output_len(), 32);
    }

    #[test]
    fn test_boxed_accumulator_matches_one_shot() {
        let mut acc = DigestAlgorithm::Sha1.accumulator();
        acc.update(b"hel").unwrap();
        acc.update(b"lo").unwrap();
        let digest = acc.finalize().unwrap();
        assert_eq!(digest, DigestAlgorithm::Sha1.digest(b"hello"));
        assert_eq!(digest.len(), DigestAlgorithm::Sha1.output_len());
    }

    #[test]
    fn test_boxed_accumulator_finalize_once() {
        let mut acc = DigestAlgorithm::default().accumulator();
        acc.finalize().unwrap();
        assert!(matches!(acc.finalize(), Err(RelayError::InvalidState { .. })));
    }
}
