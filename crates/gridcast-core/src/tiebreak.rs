// Arbitration between equal bids submitted in the same tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one owner out of several who submitted the same top bid.
///
/// The auction receives its tie-breaker at construction, so replays are
/// deterministic whenever the tie-breaker is.
pub trait TieBreaker {
    /// Choose one element of `candidates`, uniformly for fair implementations.
    /// `candidates` is never empty and is sorted ascending.
    fn choose(&mut self, candidates: &[usize]) -> usize;
}

impl<T: TieBreaker + ?Sized> TieBreaker for &mut T {
    fn choose(&mut self, candidates: &[usize]) -> usize {
        (**self).choose(candidates)
    }
}

impl<T: TieBreaker + ?Sized> TieBreaker for Box<T> {
    fn choose(&mut self, candidates: &[usize]) -> usize {
        (**self).choose(candidates)
    }
}

/// Uniform random choice backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomTieBreaker<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomTieBreaker<R> {
    pub fn new(rng: R) -> Self {
        RandomTieBreaker { rng }
    }
}

impl RandomTieBreaker<StdRng> {
    /// Deterministic tie-breaking: the same seed always yields the same
    /// sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        RandomTieBreaker::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomTieBreaker::new(StdRng::from_entropy())
    }
}

impl<R: Rng> TieBreaker for RandomTieBreaker<R> {
    fn choose(&mut self, candidates: &[usize]) -> usize {
        candidates[self.rng.gen_range(0..candidates.len())]
    }
}
