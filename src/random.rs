// src/random.rs
use rand::rngs::OsRng;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Debug, Error)]
pub enum RandomError {
    #[error("OS entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

pub type Result<T> = std::result::Result<T, RandomError>;

/// Source of cryptographic randomness for field padding and password
/// generation.
///
/// Injected explicitly wherever randomness is consumed; tests substitute a
/// deterministic instance. Implementations are not required to be internally
/// synchronized, so a multi-threaded host either serializes access or gives
/// each thread its own instance.
pub trait RandomSource {
    /// Fill `buf` with random bytes.
    fn fill_random(&mut self, buf: &mut [u8]);

    /// Fold caller-supplied unpredictable bytes into the generator state.
    ///
    /// Hosts feed this opportunistically (e.g. high-resolution timestamps on
    /// user-interaction events) to harden against a weak initial seed.
    fn add_entropy(&mut self, bytes: &[u8]);

    fn rand_u32(&mut self) -> u32 {
        let mut word = [0u8; 4];
        self.fill_random(&mut word);
        u32::from_le_bytes(word)
    }

    /// Uniform integer in `[0, n)`; `range_rand(0)` is 0.
    ///
    /// Rejection sampling: draws above the largest multiple of `n` are
    /// discarded so the modulo reduction carries no bias.
    fn range_rand(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        let limit = u32::MAX - (u32::MAX % n);
        loop {
            let r = self.rand_u32();
            if r < limit {
                return r % n;
            }
        }
    }
}

/// ChaCha20 stream seeded from the OS, re-keyed on every entropy accumulation.
pub struct SecureRandom {
    rng: ChaCha20Rng,
    key: [u8; 32],
    accumulations: u64,
}

impl SecureRandom {
    /// Seed from the OS entropy source.
    ///
    /// Fails loudly if the OS source is unavailable; there is deliberately no
    /// fallback to a weaker generator.
    pub fn new() -> Result<Self> {
        let mut key = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|e| RandomError::EntropyUnavailable(e.to_string()))?;
        let rng = ChaCha20Rng::from_seed(key);
        Ok(Self {
            rng,
            key,
            accumulations: 0,
        })
    }

    /// Deterministic instance for tests and reproducible generation.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed),
            key: seed,
            accumulations: 0,
        }
    }
}

impl RandomSource for SecureRandom {
    fn fill_random(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }

    fn add_entropy(&mut self, bytes: &[u8]) {
        self.accumulations += 1;

        // New key = H(old key || caller bytes || counter || clock). Mixing the
        // old key in means accumulation can only strengthen the state.
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(bytes);
        hasher.update(self.accumulations.to_le_bytes());
        if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
            hasher.update(now.as_nanos().to_le_bytes());
        }
        self.key.copy_from_slice(&hasher.finalize());
        self.rng = ChaCha20Rng::from_seed(self.key);

        log::debug!("random source re-keyed ({} accumulations)", self.accumulations);
    }
}

impl Drop for SecureRandom {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
