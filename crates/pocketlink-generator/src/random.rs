use crate::Generator;
use parking_lot::Mutex;
use pocketlink_core::ShortCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The 62 symbols a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated code. 62^6 is roughly 5.6e10 codes.
pub const CODE_LENGTH: usize = 6;

/// Draws each character of a code uniformly from [`ALPHABET`].
///
/// Codes are not unique by construction; the caller retries on collision.
#[derive(Debug)]
pub struct RandomGenerator {
    rng: Mutex<StdRng>,
}

impl RandomGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Option<ShortCode> {
        let mut rng = self.rng.lock();
        let code: String = (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Some(ShortCode::new_unchecked(code))
    }
}
