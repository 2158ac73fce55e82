//! Set-Associative Cache Model.
//!
//! This module implements the cache model proper: a tag array of
//! [`LineAddr`] entries, a pluggable eviction policy, dirty/writeback
//! tracking, and an optional link to the next level of the memory
//! hierarchy. For every reference issued by the simulated processor it
//! decides hit or miss and updates state exactly as the modeled hardware
//! would; misses and maintenance operations are forwarded down the
//! hierarchy so multi-level configurations compose without special cases.

/// Eviction policy implementations (LFSR, LRU, FIFO, LIP, BIP).
pub mod policies;

use std::cell::RefCell;
use std::rc::Rc;

use self::policies::{
    BipPolicy, EvictionPolicy, FifoPolicy, LfsrPolicy, LipPolicy, LruPolicy,
};
use crate::common::addr::{LineAddr, LineWalk};
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, EvictionPolicy as PolicyKind};
use crate::stats::CacheStats;

/// Forwarding interface for the next level of the memory hierarchy.
///
/// A cache holds at most one miss handler; when it is absent, the cache is
/// the last simulated level (backed by ideal main memory). [`CacheSim`]
/// implements this trait itself, so cache levels chain directly; test
/// harnesses substitute recording doubles.
pub trait MissHandler {
    /// Handles a memory reference forwarded from the level above.
    fn access(&mut self, addr: u64, bytes: u64, store: bool);

    /// Handles a clean/invalidate range operation forwarded from the level
    /// above.
    fn clean_invalidate(&mut self, addr: u64, bytes: u64, clean: bool, inval: bool);
}

/// A shareable handle to a miss handler.
///
/// Handles are reference-counted so several caches can forward into one
/// next level (e.g. split L1 instruction/data caches feeding a shared L2).
/// The hierarchy assembler keeps its own handle and owns the level's
/// lifetime; a cache never assumes ownership of its next level. Linking
/// levels into a cycle is a caller error and is not guarded against.
pub type MissHandlerRef = Rc<RefCell<dyn MissHandler>>;

/// Set-associative cache model with configurable eviction policy.
///
/// The sole persistent state is the tag array plus the policy's private
/// bookkeeping and the performance counters; no data bytes are stored. All
/// behavior is observable through the counters and through the hit/miss
/// outcomes of subsequent accesses.
///
/// # Examples
///
/// ```
/// use cachesim_core::CacheSim;
///
/// let mut dcache = CacheSim::from_descriptor("64:8:64:lru", "L1-D").unwrap();
/// dcache.access(0x8000_1000, 8, false);
/// assert_eq!(dcache.stats().read_misses, 1);
///
/// // Any address in the same 64-byte line now hits.
/// dcache.access(0x8000_1038, 8, false);
/// assert_eq!(dcache.stats().read_misses, 1);
/// ```
pub struct CacheSim {
    sets: usize,
    ways: usize,
    line_bytes: usize,
    /// Tag array, `sets * ways` entries indexed `set * ways + way`.
    lines: Vec<LineAddr>,
    policy: Box<dyn EvictionPolicy>,
    /// Remembered so snapshot clones can re-create a fresh policy.
    policy_kind: PolicyKind,
    stats: CacheStats,
    miss_handler: Option<MissHandlerRef>,
    /// When true, every miss emits a diagnostic log line. Never affects
    /// model state.
    log: bool,
}

impl CacheSim {
    /// Creates a new cache model from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the geometry is invalid: `sets` not a
    /// positive power of two, `line_bytes` below 8 or not a power of two,
    /// or zero `ways`. Validation happens before any state is allocated, so
    /// a misconfigured cache never partially exists, and values are never
    /// rounded to the nearest legal geometry.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut stats = CacheStats::default();
        stats.set_name(&config.name);

        Ok(Self {
            sets: config.sets,
            ways: config.ways,
            line_bytes: config.line_bytes,
            lines: vec![LineAddr::default(); config.sets * config.ways],
            policy: Self::create_policy(config.policy, config.sets, config.ways),
            policy_kind: config.policy,
            stats,
            miss_handler: None,
            log: false,
        })
    }

    /// Creates a cache model from a `sets:ways:linesize:policy` descriptor
    /// and a display name.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a malformed descriptor, an unknown
    /// policy name, or invalid geometry.
    pub fn from_descriptor(descriptor: &str, name: &str) -> Result<Self, ConfigError> {
        let mut config: CacheConfig = descriptor.parse()?;
        config.name = name.to_string();
        Self::new(&config)
    }

    /// Builds the boxed policy strategy object for a policy kind.
    fn create_policy(kind: PolicyKind, sets: usize, ways: usize) -> Box<dyn EvictionPolicy> {
        match kind {
            PolicyKind::Lfsr => Box::new(LfsrPolicy::new(sets, ways)),
            PolicyKind::Lru => Box::new(LruPolicy::new(sets, ways)),
            PolicyKind::Fifo => Box::new(FifoPolicy::new(sets, ways)),
            PolicyKind::Lip => Box::new(LipPolicy::new(sets, ways)),
            PolicyKind::Bip => Box::new(BipPolicy::new(sets, ways)),
        }
    }

    /// Attaches (or reassigns) the next level of the hierarchy.
    ///
    /// Victim writebacks and fill requests are forwarded to the handler on
    /// every miss, and `clean_invalidate` calls propagate through it
    /// recursively.
    pub fn set_miss_handler(&mut self, handler: MissHandlerRef) {
        self.miss_handler = Some(handler);
    }

    /// Enables or disables the diagnostic miss log.
    pub fn set_log(&mut self, enabled: bool) {
        self.log = enabled;
    }

    /// The display name of this cache.
    pub fn name(&self) -> &str {
        self.stats.name()
    }

    /// This cache's performance counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of sets.
    pub fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Line size in bytes.
    pub fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    /// Probes the tag array for `addr`'s set.
    ///
    /// Returns the matching way, if any. At most one way per set may
    /// validly hold a given tag; every mutation of the tag array preserves
    /// that invariant, and the probe asserts it in debug builds.
    fn probe(&self, addr: &LineAddr) -> Option<usize> {
        let base = addr.index() * self.ways;
        let set = &self.lines[base..base + self.ways];
        debug_assert!(
            set.iter().filter(|line| line.matches(addr)).count() <= 1,
            "duplicate tag {:#x} in set {}",
            addr.tag(),
            addr.index(),
        );
        set.iter().position(|line| line.matches(addr))
    }

    /// Evicts a way from `addr`'s set and installs `addr` in its place.
    ///
    /// Returns the previous resident of the chosen way (possibly invalid,
    /// for a cold slot) so the caller can decide about a writeback. The new
    /// entry is valid and clean; for a store the dirty bit is set later,
    /// after the fill has been forwarded.
    fn victimize(&mut self, addr: LineAddr) -> LineAddr {
        let way = self.policy.next(addr.index());
        assert!(
            way < self.ways,
            "eviction policy chose way {way} in a {}-way cache",
            self.ways
        );
        let slot = addr.index() * self.ways + way;
        let victim = self.lines[slot];
        self.lines[slot] = addr;
        self.policy.insert(addr.index(), way);
        victim
    }

    /// Simulates one memory reference.
    ///
    /// On a hit the eviction policy is told about the touch, and a store
    /// marks the line dirty. On a miss a victim is chosen and replaced; if
    /// the victim was valid and dirty, a store of one line's width at the
    /// victim's address is forwarded to the miss handler (strictly before
    /// the fill) and a writeback is counted. The fill itself is forwarded
    /// as a load of one line's width at the new line's address whenever a
    /// miss handler is attached. Dirty marking for a store miss happens
    /// last, after the resident line is final.
    pub fn access(&mut self, addr: u64, bytes: u64, store: bool) {
        self.stats.record_access(store, bytes);

        let line = LineAddr::from_raw(addr, self.sets, self.line_bytes);

        if let Some(way) = self.probe(&line) {
            if store {
                self.lines[line.index() * self.ways + way].set_dirty();
            }
            self.policy.update(line.index(), way);
            return;
        }

        self.stats.record_miss(store);
        if self.log {
            tracing::debug!(
                target: "cachesim",
                "{} {} miss {:#x}",
                self.stats.name(),
                if store { "write" } else { "read" },
                line.to_raw(self.sets, self.line_bytes),
            );
        }

        let victim = self.victimize(line);

        if victim.is_valid() && victim.is_dirty() {
            if let Some(next) = &self.miss_handler {
                let dirty_addr = victim.to_raw(self.sets, self.line_bytes);
                next.borrow_mut()
                    .access(dirty_addr, self.line_bytes as u64, true);
            }
            self.stats.record_writeback();
        }

        if let Some(next) = &self.miss_handler {
            next.borrow_mut().access(
                line.to_raw(self.sets, self.line_bytes),
                self.line_bytes as u64,
                false,
            );
        }

        if store {
            // Re-probe: the way index is re-derived rather than trusted from
            // the victim step.
            if let Some(way) = self.probe(&line) {
                self.lines[line.index() * self.ways + way].set_dirty();
            }
        }
    }

    /// Simulates a cache-management operation over a byte range.
    ///
    /// Walks every cacheline covering `[addr, addr + bytes)` in ascending
    /// order. For each line resident in this cache: with `clean` set, a
    /// dirty line counts a writeback and a clean and becomes clean (its
    /// data is considered committed, and nothing is forwarded for it); with
    /// `inval` set, the line becomes invalid regardless of dirty state.
    /// After the local sweep the identical call is forwarded to the miss
    /// handler, so a range operation propagates down the whole hierarchy.
    pub fn clean_invalidate(&mut self, addr: u64, bytes: u64, clean: bool, inval: bool) {
        for line in LineWalk::new(addr, bytes, self.sets, self.line_bytes) {
            if let Some(way) = self.probe(&line) {
                let slot = line.index() * self.ways + way;
                if clean && self.lines[slot].is_dirty() {
                    self.stats.record_writeback();
                    self.stats.record_clean();
                    self.lines[slot].set_clean();
                }
                if inval {
                    self.lines[slot].set_invalid();
                }
            }
        }

        if let Some(next) = &self.miss_handler {
            next.borrow_mut().clean_invalidate(addr, bytes, clean, inval);
        }
    }
}

impl MissHandler for CacheSim {
    fn access(&mut self, addr: u64, bytes: u64, store: bool) {
        Self::access(self, addr, bytes, store);
    }

    fn clean_invalidate(&mut self, addr: u64, bytes: u64, clean: bool, inval: bool) {
        Self::clean_invalidate(self, addr, bytes, clean, inval);
    }
}

impl Clone for CacheSim {
    /// Snapshot copy for inspecting tag-array contents and statistics.
    ///
    /// Geometry, tag array, and performance counters are copied. The
    /// eviction policy starts fresh, the miss-handler link is dropped, and
    /// the diagnostic log flag resets: a clone is detached from the
    /// hierarchy, not a functionally independent replica ready for further
    /// simulated accesses.
    fn clone(&self) -> Self {
        Self {
            sets: self.sets,
            ways: self.ways,
            line_bytes: self.line_bytes,
            lines: self.lines.clone(),
            policy: Self::create_policy(self.policy_kind, self.sets, self.ways),
            policy_kind: self.policy_kind,
            stats: self.stats.clone(),
            miss_handler: None,
            log: false,
        }
    }
}
