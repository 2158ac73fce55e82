//! Eviction Policies.
//!
//! Implements the victim-selection algorithms for set-associative caches.
//!
//! # Policies
//!
//! - `Lfsr`: Pseudo-random (linear-feedback shift register).
//! - `Lru`: Least Recently Used.
//! - `Fifo`: First-In, First-Out.
//! - `Lip`: LRU Insertion Policy.
//! - `Bip`: Bimodal Insertion Policy.
//!
//! Each policy owns its per-set bookkeeping; the cache model never inspects
//! it directly and drives the policy only through the three trait
//! operations.

/// Bimodal Insertion Policy.
pub mod bip;

/// First-In, First-Out eviction policy.
pub mod fifo;

/// Pseudo-random (LFSR) eviction policy.
pub mod lfsr;

/// LRU Insertion Policy.
pub mod lip;

/// Least Recently Used eviction policy.
pub mod lru;

pub use bip::BipPolicy;
pub use fifo::FifoPolicy;
pub use lfsr::LfsrPolicy;
pub use lip::LipPolicy;
pub use lru::LruPolicy;

/// Trait for cache eviction policies.
///
/// A policy is constructed for a fixed `(sets, ways)` geometry and driven by
/// the cache model at three points in a line's life.
pub trait EvictionPolicy {
    /// Selects the way to victimize in `set`.
    ///
    /// The returned index is in `[0, ways)`. Selection performs no order
    /// bookkeeping (that happens in [`insert`](Self::insert) once the fill
    /// lands), but the pseudo-random variant advances its register here.
    fn next(&mut self, set: usize) -> usize;

    /// Records that `way` in `set` now holds a newly-filled line.
    fn insert(&mut self, set: usize, way: usize);

    /// Records a cache hit on `way` in `set`.
    ///
    /// A no-op for pure insertion-order policies.
    fn update(&mut self, set: usize, way: usize);
}
