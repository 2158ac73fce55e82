//! First-In, First-Out (FIFO) Eviction Policy.
//!
//! This policy evicts the oldest-inserted way in a set, regardless of how
//! recently it was hit. Each set keeps its ways in insertion order; hits do
//! not reorder anything, so a frequently-used line is still evicted once it
//! is the oldest resident.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `insert()`: O(W) where W is the number of ways
//!   - `next()` / `update()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads re-using a line across many conflicting fills

use super::EvictionPolicy;

/// FIFO policy state.
pub struct FifoPolicy {
    /// A vector of insertion-order queues (one per set).
    /// Index 0 is the oldest resident, last index is the newest.
    queues: Vec<Vec<usize>>,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut queues = Vec::with_capacity(sets);
        for _ in 0..sets {
            queues.push((0..ways).collect());
        }
        Self { queues }
    }
}

impl EvictionPolicy for FifoPolicy {
    /// Returns the oldest-inserted way in the set.
    fn next(&mut self, set: usize) -> usize {
        self.queues[set].first().copied().unwrap_or(0)
    }

    /// Records `way` as the newest resident of the set.
    fn insert(&mut self, set: usize, way: usize) {
        let queue = &mut self.queues[set];
        if let Some(pos) = queue.iter().position(|&w| w == way) {
            let _ = queue.remove(pos);
        }
        queue.push(way);
    }

    /// Hits do not alter insertion order.
    fn update(&mut self, _set: usize, _way: usize) {}
}
