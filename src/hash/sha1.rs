//! SHA-1 accumulator.

use std::fmt;

use digest::Digest as _;
use ::sha1::Sha1;

use super::{ALREADY_FINALIZED, Accumulator, Digest, DigestAlgorithm};
use crate::error::Result;

/// Accumulates a SHA-1 digest.
#[derive(Clone)]
pub struct Sha1Accumulator {
    state: Option<Sha1>,
}

impl Sha1Accumulator {
    /// Creates a new accumulator.
    pub fn new() -> Self {
        Self {
            state: Some(Sha1::new()),
        }
    }

    /// Returns true once [`Accumulator::finalize`] has been called.
    pub fn is_finalized(&self) -> bool {
        self.state.is_none()
    }

    /// Convenience method to hash data in one shot.
    pub fn digest(data: &[u8]) -> Digest {
        Digest::new(DigestAlgorithm::Sha1, Sha1::digest(data).as_slice())
    }
}

impl Default for Sha1Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sha1Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha1Accumulator")
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

impl Accumulator for Sha1Accumulator {
    fn algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::Sha1
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        let state = self.state.as_mut().ok_or(ALREADY_FINALIZED)?;
        state.update(data);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Digest> {
        let state = self.state.take().ok_or(ALREADY_FINALIZED)?;
        Ok(Digest::new(DigestAlgorithm::Sha1, state.finalize().as_slice()))
    }
}
