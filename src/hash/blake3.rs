//! BLAKE3 accumulator.

use super::{ALREADY_FINALIZED, Accumulator, Digest, DigestAlgorithm};
use crate::error::Result;

/// Accumulates a BLAKE3 digest.
#[derive(Debug, Clone)]
pub struct Blake3Accumulator {
    state: blake3::Hasher,
    finalized: bool,
}

impl Blake3Accumulator {
    /// Creates a new accumulator.
    pub fn new() -> Self {
        Self {
            state: blake3::Hasher::new(),
            finalized: false,
        }
    }

    /// Creates an accumulator for keyed hashing.
    pub fn new_keyed(key: &[u8; 32]) -> Self {
        Self {
            state: blake3::Hasher::new_keyed(key),
            finalized: false,
        }
    }

    /// Convenience method to hash data in one shot.
    pub fn digest(data: &[u8]) -> Digest {
        Digest::new(DigestAlgorithm::Blake3, blake3::hash(data).as_bytes())
    }
}

impl Default for Blake3Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for Blake3Accumulator {
    fn algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::Blake3
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(ALREADY_FINALIZED);
        }
        self.state.update(data);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Digest> {
        if self.finalized {
            return Err(ALREADY_FINALIZED);
        }
        self.finalized = true;
        Ok(Digest::new(
            DigestAlgorithm::Blake3,
            self.state.finalize().as_bytes(),
        ))
    }
}
