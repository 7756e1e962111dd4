//! Injectable randomness for move selection.
//!
//! Random picks go through [`RandomSource`] instead of a global generator,
//! so tests can script exactly which squares and coin flips come up.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two random draws the difficulty tiers need.
pub trait RandomSource {
    /// Uniform integer in `0..=8`.
    fn next_index(&mut self) -> usize;

    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_index(&mut self) -> usize {
        (**self).next_index()
    }

    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic generator for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_index(&mut self) -> usize {
        self.rng.random_range(0..=8)
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// Replays a fixed script of draws.
///
/// Once the index script runs out, indices continue counting up from zero
/// (mod 9), so a rejection loop always reaches an empty square. Once the
/// flip script runs out, every flip is `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    indices: std::collections::VecDeque<usize>,
    flips: std::collections::VecDeque<bool>,
    counter: usize,
    draws: usize,
}

impl ScriptedSource {
    /// Creates a source that yields `indices` and `flips` in order.
    pub fn new(
        indices: impl IntoIterator<Item = usize>,
        flips: impl IntoIterator<Item = bool>,
    ) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            flips: flips.into_iter().collect(),
            counter: 0,
            draws: 0,
        }
    }

    /// Total number of index draws so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Coin flips still waiting in the script.
    pub fn remaining_flips(&self) -> usize {
        self.flips.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_index(&mut self) -> usize {
        self.draws += 1;
        self.indices.pop_front().unwrap_or_else(|| {
            let index = self.counter % 9;
            self.counter += 1;
            index
        })
    }

    fn coin_flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}
