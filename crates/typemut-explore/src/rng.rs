//! Seeded randomness for generation runs.
//!
//! A run owns one ChaCha8Rng seeded from the configured seed. Same seed,
//! same corpus, same oracle verdicts -> same generated values.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Create the deterministic RNG for a generation run.
pub fn generator_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Resolve an optional configured seed, drawing a fresh one from the OS
/// when none is given. The resolved seed is what gets logged and reported.
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(rand::random)
}
