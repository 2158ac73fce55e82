//! Bimodal Insertion Policy (BIP).
//!
//! BIP behaves like LIP (LRU hit promotion with fills parked at the LRU
//! end) except that a small fixed fraction of fills is instead inserted at
//! the MRU end. The occasional MRU insertion lets a re-used working set
//! establish itself in the cache, at the cost of some of LIP's resistance to
//! streaming thrash. The choice is driven by the policy's own LFSR, so a
//! given seed always produces the same insertion pattern.

use super::lfsr::galois32;
use super::lip::park;
use super::lru::touch;
use super::EvictionPolicy;

/// One fill in `BIMODAL_INTERVAL` is inserted at the MRU end.
const BIMODAL_INTERVAL: u32 = 32;

/// Register seed for the insertion-choice LFSR.
const CHOICE_SEED: u32 = 0xBEEF;

/// BIP policy state.
pub struct BipPolicy {
    /// A vector of recency stacks (one per set).
    /// Index 0 is MRU, last index is LRU.
    stacks: Vec<Vec<usize>>,
    /// Shift register deciding which fills get the MRU slot.
    choice: u32,
}

impl BipPolicy {
    /// Creates a new BIP policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut stacks = Vec::with_capacity(sets);
        for _ in 0..sets {
            stacks.push((0..ways).collect());
        }
        Self {
            stacks,
            choice: CHOICE_SEED,
        }
    }
}

impl EvictionPolicy for BipPolicy {
    /// Returns the way at the bottom of the recency stack (LRU position).
    fn next(&mut self, set: usize) -> usize {
        self.stacks[set].last().copied().unwrap_or(0)
    }

    /// Parks the fill at the LRU end, except for roughly one fill in
    /// `BIMODAL_INTERVAL` which is promoted to MRU.
    fn insert(&mut self, set: usize, way: usize) {
        self.choice = galois32(self.choice);
        if self.choice % BIMODAL_INTERVAL == 0 {
            touch(&mut self.stacks[set], way);
        } else {
            park(&mut self.stacks[set], way);
        }
    }

    /// A hit promotes the touched way to most-recently-used, as in LRU.
    fn update(&mut self, set: usize, way: usize) {
        touch(&mut self.stacks[set], way);
    }
}
