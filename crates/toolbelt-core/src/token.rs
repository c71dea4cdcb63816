//! Random token generation
//!
//! Tokens are meant for collision-avoidance (upload renaming, short IDs),
//! not for secrets: the generator is a seeded pseudo-random source and its
//! output must not be treated as security-grade.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// 63 symbols; a 6-bit index of 63 is the rejection sentinel that keeps the
/// mapping uniform.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Mutex-guarded pseudo-random token generator.
///
/// Construct one per toolkit instance and share it; concurrent callers
/// serialize on the internal lock.
pub struct TokenGenerator {
    rng: Mutex<StdRng>,
}

impl TokenGenerator {
    /// Generator seeded from the system clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64);
        Self::from_seed(seed)
    }

    /// Deterministic generator for tests and reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// A string of exactly `n` characters drawn from `[a-zA-Z0-9_]`, or the
    /// empty string when `n` is zero.
    ///
    /// Consumes the random word six bits at a time, refilling when fewer than
    /// six bits of budget remain; an index equal to the alphabet length is
    /// discarded and redrawn.
    pub fn random_string(&self, n: usize) -> String {
        if n == 0 {
            return String::new();
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let mut out = String::with_capacity(n);
        let mut word: u64 = 0;
        let mut bits: u32 = 0;

        while out.len() < n {
            if bits < 6 {
                word = rng.next_u64();
                bits = 64;
            }

            let idx = (word & 0x3F) as usize;
            word >>= 6;
            bits -= 6;

            if idx >= ALPHABET.len() {
                continue;
            }

            out.push(ALPHABET[idx] as char);
        }

        out
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
