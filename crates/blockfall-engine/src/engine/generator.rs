use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::core::ShapeKind;

/// Seedable source of uniformly distributed shapes.
///
/// Every draw is independent, so the same shape can appear several times in
/// a row; there is no bag fairness smoothing the sequence out.
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: Pcg32,
}

impl ShapeGenerator {
    /// Creates a generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Creates a generator with a fixed seed, for a reproducible sequence.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draws the next shape.
    pub fn draw(&mut self) -> ShapeKind {
        self.rng.random()
    }
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
