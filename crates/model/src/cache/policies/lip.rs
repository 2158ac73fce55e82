//! LRU Insertion Policy (LIP).
//!
//! LIP keeps LRU's recency stacks and hit promotion, but inserts fills at
//! the LRU end instead of the MRU end: a newly-filled line is the next
//! eviction candidate unless it is re-referenced first. Streaming data that
//! is touched once passes through a single way instead of flushing the whole
//! set, while re-used lines earn MRU protection on their first hit.

use super::lru::touch;
use super::EvictionPolicy;

/// LIP policy state.
pub struct LipPolicy {
    /// A vector of recency stacks (one per set).
    /// Index 0 is MRU, last index is LRU.
    stacks: Vec<Vec<usize>>,
}

impl LipPolicy {
    /// Creates a new LIP policy instance.
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
        Self { stacks }
    }
}

/// Moves `way` to the back (LRU position) of a recency stack.
pub(super) fn park(stack: &mut Vec<usize>, way: usize) {
    if let Some(pos) = stack.iter().position(|&w| w == way) {
        let _ = stack.remove(pos);
    }
    stack.push(way);
}

impl EvictionPolicy for LipPolicy {
    /// Returns the way at the bottom of the recency stack (LRU position).
    fn next(&mut self, set: usize) -> usize {
        self.stacks[set].last().copied().unwrap_or(0)
    }

    /// Fills enter at the LRU end: an un-referenced new line is the next
    /// victim.
    fn insert(&mut self, set: usize, way: usize) {
        park(&mut self.stacks[set], way);
    }

    /// A hit promotes the touched way to most-recently-used, as in LRU.
    fn update(&mut self, set: usize, way: usize) {
        touch(&mut self.stacks[set], way);
    }
}
