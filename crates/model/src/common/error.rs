//! Configuration error definitions.
//!
//! All configuration problems are detected eagerly, before any tag array is
//! allocated, and surface as [`ConfigError`] values; a misconfigured cache
//! never partially exists. The messages spell out the accepted configuration
//! grammar so a caller can correct its input.

use thiserror::Error;

/// A fatal cache configuration error.
///
/// There are no transient failure modes in this model; every variant here is
/// a caller-supplied configuration the hardware could not be built with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `sets` is zero or not a power of two.
    #[error(
        "invalid set count {0}: sets must be a positive power of two \
         (cache configurations are `sets:ways:linesize:policy`)"
    )]
    InvalidSets(usize),

    /// `line_bytes` is below 8 or not a power of two. Addresses below the
    /// 8-byte granularity are considered indivisible.
    #[error(
        "invalid line size {0}: linesize must be a power of two of at \
         least 8 bytes (cache configurations are `sets:ways:linesize:policy`)"
    )]
    InvalidLineSize(usize),

    /// The cache has no ways to hold lines in.
    #[error("invalid associativity: a cache must have at least one way")]
    ZeroWays,

    /// The eviction policy name matched no known variant.
    #[error(
        "unknown eviction policy `{0}`: expected one of `lfsr`, `lru`, \
         `fifo`, `lip`, or `bip`"
    )]
    UnknownPolicy(String),

    /// A descriptor string did not follow the configuration grammar.
    #[error(
        "malformed cache descriptor `{0}`: expected `sets:ways:linesize:policy` \
         where sets, ways, and linesize are positive integers, sets and \
         linesize are powers of two with linesize at least 8, and policy is \
         one of `lfsr`, `lru`, `fifo`, `lip`, or `bip` (e.g. `64:8:64:lru`)"
    )]
    MalformedDescriptor(String),
}
