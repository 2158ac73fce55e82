//! Cache Hierarchy Forwarding Tests.
//!
//! Verifies what a cache forwards to its miss handler and in what order:
//! victim writebacks strictly before fill requests, fills on every miss,
//! clean/invalidate propagation after the local sweep, and real multi-level
//! chains (including a shared next level behind split L1 caches).

use std::cell::RefCell;
use std::rc::Rc;

use cachesim_core::config::{CacheConfig, EvictionPolicy};
use cachesim_core::CacheSim;

use crate::common::mocks::memory::{Forwarded, RecordingMemory};

// ──────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────

/// Direct-mapped 4-set cache with 16-byte lines: 0x00 and 0x40 conflict in
/// set 0, so a second fill always evicts the first.
fn small_cache(name: &str) -> CacheSim {
    CacheSim::from_descriptor("4:1:16:lru", name).unwrap()
}

fn config(name: &str, sets: usize, ways: usize) -> CacheConfig {
    CacheConfig {
        name: name.to_string(),
        sets,
        ways,
        line_bytes: 16,
        policy: EvictionPolicy::Lru,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Fill forwarding
// ══════════════════════════════════════════════════════════

/// A miss with a clean (or cold) victim forwards exactly one fill: a load
/// of one line's width at the new line's base address.
#[test]
fn miss_forwards_line_sized_fill() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x4C, 4, false);
    assert_eq!(
        memory.borrow().calls,
        vec![Forwarded::Access {
            addr: 0x40,
            bytes: 16,
            store: false,
        }]
    );
}

/// A store miss still forwards its fill as a load; the dirty data stays
/// local until eviction.
#[test]
fn store_miss_fill_is_a_load() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x00, 8, true);
    assert_eq!(
        memory.borrow().calls,
        vec![Forwarded::Access {
            addr: 0x00,
            bytes: 16,
            store: false,
        }]
    );
}

/// A hit forwards nothing.
#[test]
fn hit_forwards_nothing() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x00, 8, false);
    memory.borrow_mut().calls.clear();

    l1.access(0x08, 8, false);
    l1.access(0x00, 8, true);
    assert!(memory.borrow().calls.is_empty());
}

// ══════════════════════════════════════════════════════════
// 2. Writeback ordering
// ══════════════════════════════════════════════════════════

/// Evicting a dirty line forwards exactly one line-sized store at the
/// victim's address, strictly before the fill request for the new line.
#[test]
fn dirty_eviction_writes_back_before_fill() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x00, 8, true); // store miss, line 0x00 dirty
    l1.access(0x40, 8, false); // conflict miss, evicts dirty 0x00

    assert_eq!(
        memory.borrow().calls,
        vec![
            // Fill for the store miss.
            Forwarded::Access {
                addr: 0x00,
                bytes: 16,
                store: false,
            },
            // Victim writeback, before the new line's fill.
            Forwarded::Access {
                addr: 0x00,
                bytes: 16,
                store: true,
            },
            Forwarded::Access {
                addr: 0x40,
                bytes: 16,
                store: false,
            },
        ]
    );
}

/// Evicting a clean victim forwards no store at all.
#[test]
fn clean_eviction_forwards_no_store() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x00, 8, false);
    l1.access(0x40, 8, false);

    let stores: Vec<_> = memory
        .borrow()
        .accesses()
        .into_iter()
        .filter(|c| matches!(c, Forwarded::Access { store: true, .. }))
        .collect();
    assert!(stores.is_empty());
}

/// Dirty propagation: a line dirtied by a store miss produces exactly one
/// downstream write over its whole lifetime, at eviction time.
#[test]
fn dirty_line_written_back_exactly_once() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x00, 8, true); // dirty fill
    l1.access(0x08, 8, true); // store hit, same line
    l1.access(0x40, 8, false); // evicts it
    l1.access(0x80, 8, false); // evicts the clean 0x40 line

    let victim_stores = memory
        .borrow()
        .calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                Forwarded::Access {
                    addr: 0x00,
                    bytes: 16,
                    store: true,
                }
            )
        })
        .count();
    assert_eq!(victim_stores, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Clean/invalidate propagation
// ══════════════════════════════════════════════════════════

/// The identical clean_invalidate call is forwarded exactly once, after
/// the local sweep, with no access traffic mixed in.
#[test]
fn clean_invalidate_propagates_identically() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.access(0x00, 8, true);
    l1.access(0x10, 8, true);
    memory.borrow_mut().calls.clear();

    l1.clean_invalidate(0x00, 0x2C, true, true);
    assert_eq!(
        memory.borrow().calls,
        vec![Forwarded::CleanInvalidate {
            addr: 0x00,
            bytes: 0x2C,
            clean: true,
            inval: true,
        }]
    );
}

/// Propagation happens even when the range touches nothing local: the
/// levels below may still hold lines in it.
#[test]
fn clean_invalidate_propagates_when_range_is_cold() {
    let mut l1 = small_cache("L1");
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));
    l1.set_miss_handler(memory.clone());

    l1.clean_invalidate(0x1000, 64, false, true);
    assert_eq!(
        memory.borrow().calls,
        vec![Forwarded::CleanInvalidate {
            addr: 0x1000,
            bytes: 64,
            clean: false,
            inval: true,
        }]
    );
}

/// The call recurses through every level of a chain.
#[test]
fn clean_invalidate_recurses_through_chain() {
    let mut l1 = small_cache("L1");
    let l2 = Rc::new(RefCell::new(
        CacheSim::new(&config("L2", 16, 4)).unwrap(),
    ));
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));

    l2.borrow_mut().set_miss_handler(memory.clone());
    l1.set_miss_handler(l2.clone());

    l1.clean_invalidate(0x00, 32, true, false);
    assert_eq!(
        memory.borrow().calls,
        vec![Forwarded::CleanInvalidate {
            addr: 0x00,
            bytes: 32,
            clean: true,
            inval: false,
        }]
    );
}

// ══════════════════════════════════════════════════════════
// 4. Multi-level chains
// ══════════════════════════════════════════════════════════

/// An L1 miss becomes a line-sized L2 access; an L1 hit never reaches L2.
#[test]
fn two_level_chain_counts() {
    let mut l1 = small_cache("L1");
    let l2 = Rc::new(RefCell::new(
        CacheSim::new(&config("L2", 16, 4)).unwrap(),
    ));
    l1.set_miss_handler(l2.clone());

    l1.access(0x00, 4, false); // L1 miss -> L2 fill access
    l1.access(0x08, 4, false); // L1 hit -> nothing downstream

    assert_eq!(l2.borrow().stats().read_accesses, 1);
    assert_eq!(l2.borrow().stats().bytes_read, 16);
    assert_eq!(l2.borrow().stats().read_misses, 1);

    // Push 0x00 out of the direct-mapped L1 with a conflicting line; the
    // re-fetch then misses in L1 but hits L2's retained copy.
    l1.access(0x40, 4, false); // L1 evicts 0x00 (clean), L2 miss on 0x40
    l1.access(0x00, 4, false); // L1 miss, L2 hit
    assert_eq!(l2.borrow().stats().read_accesses, 3);
    assert_eq!(l2.borrow().stats().read_misses, 2);
}

/// A victim writeback reaches L2 as a store and dirties the line there, so
/// it is L2 that eventually writes it back to memory.
#[test]
fn writeback_dirties_next_level() {
    let mut l1 = small_cache("L1");
    let l2 = Rc::new(RefCell::new(
        CacheSim::new(&config("L2", 16, 4)).unwrap(),
    ));
    let memory = Rc::new(RefCell::new(RecordingMemory::new()));

    l2.borrow_mut().set_miss_handler(memory.clone());
    l1.set_miss_handler(l2.clone());

    l1.access(0x00, 8, true); // dirty in L1
    l1.access(0x40, 8, false); // evicts it; L2 receives the store
    assert_eq!(l2.borrow().stats().write_accesses, 1);
    assert_eq!(l2.borrow().stats().bytes_written, 16);

    // Cleaning L2's copy counts the writeback there.
    l1.clean_invalidate(0x00, 16, true, false);
    assert_eq!(l2.borrow().stats().writebacks, 1);
    assert_eq!(l2.borrow().stats().clean_invalidates, 1);
}

/// Split L1 instruction/data caches share one L2 victim: both forward into
/// the same handle.
#[test]
fn split_l1_caches_share_l2() {
    let mut l1i = small_cache("L1-I");
    let mut l1d = small_cache("L1-D");
    let l2 = Rc::new(RefCell::new(
        CacheSim::new(&config("L2", 16, 4)).unwrap(),
    ));

    l1i.set_miss_handler(l2.clone());
    l1d.set_miss_handler(l2.clone());

    l1i.access(0x00, 4, false);
    l1d.access(0x200, 8, false);
    assert_eq!(l2.borrow().stats().read_accesses, 2);

    // The line L1-I pulled into L2 hits there when L1-D misses on it.
    l1d.access(0x00, 8, false);
    assert_eq!(l2.borrow().stats().read_accesses, 3);
    assert_eq!(l2.borrow().stats().read_misses, 2);
}
