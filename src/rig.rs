//! Mining rig configuration.

use thiserror::Error;

/// Numeric type used for hash rates, in MH/s.
pub type HashRate = f64;

/// A configured mining rig. Immutable once constructed; changing the hash
/// rate of an account means building a new rig and swapping it in whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningRig {
    hash_rate: HashRate,
}

#[derive(Debug, Error)]
pub enum RigError {
    #[error("hash rate {0} is negative")]
    NegativeHashRate(HashRate),
    #[error("hash rate {0} is not a finite number")]
    NonFiniteHashRate(HashRate),
}

impl MiningRig {
    /// Creates a rig with the given hash rate. Negative and non-finite rates
    /// are rejected rather than clamped, leaving the caller's state
    /// untouched.
    pub fn new(hash_rate: HashRate) -> Result<Self, RigError> {
        if !hash_rate.is_finite() {
            return Err(RigError::NonFiniteHashRate(hash_rate));
        }
        if hash_rate < 0.0 {
            return Err(RigError::NegativeHashRate(hash_rate));
        }

        Ok(MiningRig { hash_rate })
    }

    /// The configured hash rate in MH/s. Never negative.
    #[inline]
    pub fn hash_rate(&self) -> HashRate {
        self.hash_rate
    }

    /// Returns true iff this rig contributes mining power. A zero-rate rig
    /// is valid but can never find a block.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.hash_rate > 0.0
    }
}
