//! Set-associative cache model library.
//!
//! This crate implements the cache model used inside cycle-level hardware
//! simulators, with the following:
//! 1. **Address decomposition:** Bit-exact tag/index splitting of raw 64-bit
//!    addresses, the inverse mapping, and cacheline-granular range walking.
//! 2. **Eviction policies:** Five interchangeable victim-selection algorithms
//!    (LFSR, LRU, FIFO, LIP, BIP) behind one strategy trait.
//! 3. **Cache model:** Hit/miss decisions, dirty/writeback tracking, range
//!    clean/invalidate sweeps, and miss forwarding through a multi-level
//!    hierarchy.
//! 4. **Configuration:** Validated geometry from structured config or the
//!    `sets:ways:linesize:policy` descriptor grammar.
//! 5. **Statistics:** Per-cache access/miss/writeback counters and reporting.

/// Cache model (tag array, hit/miss logic, hierarchy linkage).
pub mod cache;
/// Common value types (line addresses, configuration errors).
pub mod common;
/// Cache configuration (defaults, policy selection, descriptor parsing).
pub mod config;
/// Per-cache performance counters and reporting.
pub mod stats;

/// Main cache model type; construct with [`CacheSim::new`] or
/// [`CacheSim::from_descriptor`].
pub use crate::cache::CacheSim;
/// Forwarding interface implemented by anything that can stand in as the
/// next level of the memory hierarchy.
pub use crate::cache::MissHandler;
/// Configuration type; deserialize from JSON or parse a descriptor string.
pub use crate::config::CacheConfig;
/// Configuration error taxonomy.
pub use crate::common::error::ConfigError;
