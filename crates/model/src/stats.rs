//! Per-cache performance counters and reporting.
//!
//! This module tracks what the cache model observes. It provides:
//! 1. **Access counters:** Read/write access and byte counts.
//! 2. **Miss counters:** Read/write misses and the derived miss rate.
//! 3. **Maintenance counters:** Writebacks and clean operations.
//!
//! The cache notifies the counters; it never reads them back, so counting
//! can never influence hit/miss decisions.

/// Performance counters for one cache.
///
/// Counters are plain fields so drivers can aggregate or export them
/// however they like; `print` renders the standard report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    name: String,
    /// Number of load accesses observed.
    pub read_accesses: u64,
    /// Number of store accesses observed.
    pub write_accesses: u64,
    /// Total bytes requested by load accesses.
    pub bytes_read: u64,
    /// Total bytes requested by store accesses.
    pub bytes_written: u64,
    /// Number of load accesses that missed.
    pub read_misses: u64,
    /// Number of store accesses that missed.
    pub write_misses: u64,
    /// Number of dirty lines written back (on eviction or explicit clean).
    pub writebacks: u64,
    /// Number of lines cleaned by `clean_invalidate`.
    pub clean_invalidates: u64,
}

impl CacheStats {
    /// Sets the display name used in reports.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records an attempted access.
    pub fn record_access(&mut self, store: bool, bytes: u64) {
        if store {
            self.write_accesses += 1;
            self.bytes_written += bytes;
        } else {
            self.read_accesses += 1;
            self.bytes_read += bytes;
        }
    }

    /// Records a miss.
    pub fn record_miss(&mut self, store: bool) {
        if store {
            self.write_misses += 1;
        } else {
            self.read_misses += 1;
        }
    }

    /// Records a dirty-line writeback.
    pub fn record_writeback(&mut self) {
        self.writebacks += 1;
    }

    /// Records a clean operation.
    pub fn record_clean(&mut self) {
        self.clean_invalidates += 1;
    }

    /// Total accesses, loads and stores combined.
    pub fn accesses(&self) -> u64 {
        self.read_accesses + self.write_accesses
    }

    /// Total misses, loads and stores combined.
    pub fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Miss rate as a percentage of all accesses (0.0 when idle).
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            100.0 * self.misses() as f64 / total as f64
        }
    }

    /// Prints the standard statistics report to stdout.
    pub fn print(&self) {
        println!("{} cache statistics", self.name);
        println!("  bytes_read             {}", self.bytes_read);
        println!("  bytes_written          {}", self.bytes_written);
        println!("  read_accesses          {}", self.read_accesses);
        println!("  write_accesses         {}", self.write_accesses);
        println!("  read_misses            {}", self.read_misses);
        println!("  write_misses           {}", self.write_misses);
        println!("  writebacks             {}", self.writebacks);
        println!("  clean_invalidates      {}", self.clean_invalidates);
        println!("  miss_rate              {:.3}%", self.miss_rate());
    }
}
