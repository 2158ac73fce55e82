//! Configuration system for the cache model.
//!
//! This module defines the structures used to parameterize a cache. It
//! provides:
//! 1. **Defaults:** Baseline geometry constants used when fields are omitted.
//! 2. **Structures:** The per-cache [`CacheConfig`] consumed by
//!    [`CacheSim::new`](crate::cache::CacheSim::new).
//! 3. **Enums:** The eviction-policy selector with serde and string parsing.
//!
//! Configuration is supplied as JSON from a driver's config file, built in
//! code, or parsed from the compact `sets:ways:linesize:policy` descriptor
//! grammar. Validation is eager: geometry is checked before any cache state
//! is created, and invalid values fail instead of being rounded.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the cache model.
///
/// These values describe a plausible L1 data cache and apply when a field
/// is not explicitly set in a deserialized configuration.
mod defaults {
    /// Default number of sets (64, power of two).
    pub const CACHE_SETS: usize = 64;

    /// Default associativity (8 ways).
    pub const CACHE_WAYS: usize = 8;

    /// Default cache line size in bytes (64 bytes).
    ///
    /// Matches typical modern processor cache line sizes.
    pub const CACHE_LINE: usize = 64;
}

/// Eviction policy algorithms.
///
/// Selects the algorithm used to pick the victim way when a new line must be
/// installed in a full set. Each variant's bookkeeping is disjoint and owned
/// by the policy instance; see [`cache::policies`](crate::cache::policies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Pseudo-random selection from a linear-feedback shift register.
    ///
    /// Deterministic for a fixed seed, so simulation runs are reproducible.
    #[default]
    #[serde(alias = "LFSR")]
    Lfsr,
    /// Least Recently Used.
    ///
    /// Evicts the way whose last touch (fill or hit) is oldest.
    #[serde(alias = "LRU")]
    Lru,
    /// First In, First Out.
    ///
    /// Evicts the oldest-inserted way; hits do not reorder.
    #[serde(alias = "FIFO")]
    Fifo,
    /// LRU Insertion Policy.
    ///
    /// LRU hit promotion, but fills enter at the LRU end: a new line is an
    /// immediate eviction candidate unless re-referenced.
    #[serde(alias = "LIP")]
    Lip,
    /// Bimodal Insertion Policy.
    ///
    /// LIP with a small fixed probability of inserting at the MRU end,
    /// trading some thrashing-resistance for adaptability.
    #[serde(alias = "BIP")]
    Bip,
}

impl EvictionPolicy {
    /// The accepted policy names, in canonical (lowercase) form.
    pub const NAMES: &'static [&'static str] = &["lfsr", "lru", "fifo", "lip", "bip"];

    /// The canonical name of this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lfsr => "lfsr",
            Self::Lru => "lru",
            Self::Fifo => "fifo",
            Self::Lip => "lip",
            Self::Bip => "bip",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    /// Parses a policy name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "lfsr" => Ok(Self::Lfsr),
            "lru" => Ok(Self::Lru),
            "fifo" => Ok(Self::Fifo),
            "lip" => Ok(Self::Lip),
            "bip" => Ok(Self::Bip),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Configuration of one cache.
///
/// # Examples
///
/// Deserializing from JSON (typical driver config usage):
///
/// ```
/// use cachesim_core::config::{CacheConfig, EvictionPolicy};
///
/// let json = r#"{
///     "name": "L1-D",
///     "sets": 64,
///     "ways": 4,
///     "line_bytes": 64,
///     "policy": "lru"
/// }"#;
///
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.sets, 64);
/// assert_eq!(config.policy, EvictionPolicy::Lru);
/// assert!(config.validate().is_ok());
/// ```
///
/// Parsing the compact descriptor grammar:
///
/// ```
/// use cachesim_core::config::CacheConfig;
///
/// let config: CacheConfig = "256:8:64:fifo".parse().unwrap();
/// assert_eq!(config.sets, 256);
/// assert_eq!(config.ways, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Display name used in statistics reports and diagnostic logging.
    #[serde(default)]
    pub name: String,

    /// Number of sets (must be a positive power of two)
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (number of ways, must be at least 1)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Cache line size in bytes (power of two, at least 8)
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Eviction policy
    #[serde(default)]
    pub policy: EvictionPolicy,
}

impl CacheConfig {
    /// Returns the default number of sets.
    fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default line size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Checks the geometry constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `sets` is zero or not a power of two,
    /// when `line_bytes` is below 8 or not a power of two, or when `ways`
    /// is zero. Values are never rounded to the nearest legal geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sets == 0 || !self.sets.is_power_of_two() {
            return Err(ConfigError::InvalidSets(self.sets));
        }
        if self.line_bytes < 8 || !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::InvalidLineSize(self.line_bytes));
        }
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration: 64 sets, 8 ways, 64-byte
    /// lines, LFSR eviction, empty name.
    fn default() -> Self {
        Self {
            name: String::new(),
            sets: defaults::CACHE_SETS,
            ways: defaults::CACHE_WAYS,
            line_bytes: defaults::CACHE_LINE,
            policy: EvictionPolicy::default(),
        }
    }
}

impl FromStr for CacheConfig {
    type Err = ConfigError;

    /// Parses the `sets:ways:linesize:policy` descriptor grammar.
    ///
    /// The three numeric fields are decimal; the policy name is matched
    /// case-insensitively. The parsed geometry is validated before the
    /// configuration is returned, so a successful parse is always
    /// constructible. The name field is left empty.
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedDescriptor(s.to_string());

        let mut fields = s.split(':');
        let sets = fields.next().ok_or_else(malformed)?;
        let ways = fields.next().ok_or_else(malformed)?;
        let line_bytes = fields.next().ok_or_else(malformed)?;
        let policy = fields.next().ok_or_else(malformed)?;
        if fields.next().is_some() {
            return Err(malformed());
        }

        let config = Self {
            name: String::new(),
            sets: sets.trim().parse().map_err(|_| malformed())?,
            ways: ways.trim().parse().map_err(|_| malformed())?,
            line_bytes: line_bytes.trim().parse().map_err(|_| malformed())?,
            policy: policy.trim().parse()?,
        };
        config.validate()?;
        Ok(config)
    }
}
