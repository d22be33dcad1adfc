//! Sources of randomness for salts and nonces

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::error::{CryptosafeError, ErrorCategory, ErrorKind, Result};

/// A source of cryptographically secure random bytes.
///
/// Failures must be reported, never papered over with a weaker source.
pub trait SecureRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            CryptosafeError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::RandomnessUnavailable,
                "operating system randomness unavailable",
                e,
            )
        })
    }
}

/// Deterministic generator seeded from a fixed value.
///
/// This is ONLY for tests that need reproducible salts and nonces.
/// NEVER use this in production.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SecureRandom for SeededRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.rng.fill_bytes(dest);
        Ok(())
    }
}
