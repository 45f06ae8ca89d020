//! Keyed random oracle
//!
//! Every hash `H(·)` in a random OT execution is keyed BLAKE3 under the
//! execution nonce, so both parties derive identical outputs for identical
//! inputs while distinct executions stay independent.

use crate::types::{NONCE_BYTES, OT_BYTES};
use crate::{Error, Result};

/// Reusable keyed hash accumulator owned by one OT session
#[derive(Clone)]
pub struct RandomOracle {
    hasher: blake3::Hasher,
}

impl RandomOracle {
    /// Key a new oracle with an execution nonce.
    ///
    /// The nonce must be exactly [`NONCE_BYTES`] long.
    pub fn new(nonce: &[u8]) -> Result<Self> {
        let key: &[u8; NONCE_BYTES] = nonce.try_into().map_err(|_| Error::InvalidNonceLength {
            expected: NONCE_BYTES,
            actual: nonce.len(),
        })?;

        Ok(Self {
            hasher: blake3::Hasher::new_keyed(key),
        })
    }

    /// Drop everything absorbed so far, keeping the key
    pub fn reset(&mut self) -> &mut Self {
        self.hasher.reset();
        self
    }

    /// Absorb more input
    pub fn absorb(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.update(bytes);
        self
    }

    /// Read `OT_BYTES` of output from the current state
    pub fn extract(&self) -> [u8; OT_BYTES] {
        let mut out = [0u8; OT_BYTES];
        self.hasher.finalize_xof().fill(&mut out);
        out
    }

    /// `H(input)`: reset, absorb and extract in one call
    pub fn digest(&mut self, input: &[u8]) -> [u8; OT_BYTES] {
        self.reset().absorb(input).extract()
    }
}
