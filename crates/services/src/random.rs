//! Injectable randomness for shuffling and sampling.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform index source used by every shuffle in the services layer.
pub trait RandomSource: Send {
    /// Returns an index in `0..=upper`.
    fn index_upto(&mut self, upper: usize) -> usize;
}

/// OS-seeded generator for normal use.
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator, handy for replaying a panel.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn index_upto(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..=upper)
    }
}

/// Replays a fixed list of picks.
///
/// Each pick is clamped to the requested upper bound. Once the script runs
/// out every draw returns `upper`, which makes a Fisher-Yates pass a no-op.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }

    /// A source that never reorders anything.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn index_upto(&mut self, upper: usize) -> usize {
        self.picks.pop_front().map_or(upper, |pick| pick.min(upper))
    }
}

/// In-place Fisher-Yates: for each `i` from the end down to 1, swap with a
/// uniform index in `0..=i`.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.index_upto(i);
        items.swap(i, j);
    }
}

/// Shuffled copy of `items`.
#[must_use]
pub fn shuffled<T: Clone>(items: &[T], rng: &mut dyn RandomSource) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(&mut out, rng);
    out
}
