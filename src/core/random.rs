//! Injectable randomness for canned selections
//!
//! Every "AI" answer, quick-reply set and veterinarian assignment is a pick
//! from a fixed list. Routing those picks through [`Chooser`] lets tests
//! script exactly which entry comes back.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform indices
pub trait Chooser: Send {
    /// Return an index in `0..len`; `len` is never zero
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Pick one entry of `items` through `chooser`
pub fn pick<'a, T>(chooser: &mut dyn Chooser, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = chooser.choose_index(items.len());
    items.get(index.min(items.len() - 1))
}

/// Uniform picks backed by `StdRng`
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is configured, entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    /// Derive an independent chooser, e.g. one per mounted view
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.gen())
    }
}

impl Chooser for RandomChooser {
    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices, wrapping each into range
///
/// Once the script runs out every pick is index 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    script: VecDeque<usize>,
}

impl ScriptedChooser {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl Chooser for ScriptedChooser {
    fn choose_index(&mut self, len: usize) -> usize {
        self.script.pop_front().unwrap_or(0) % len
    }
}
