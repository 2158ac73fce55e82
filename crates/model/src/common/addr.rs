//! Cacheline address decomposition.
//!
//! This module defines the value type a cache tag array is made of. It
//! provides:
//! 1. **Decomposition:** Splitting a raw 64-bit address into tag and set
//!    index for a given geometry.
//! 2. **Reconstruction:** The inverse mapping back to the address of the
//!    first byte of the line, used when forwarding writebacks and fills.
//! 3. **Range walking:** Stepping through every cacheline covering a byte
//!    range without recomputing from raw addresses.
//!
//! Geometry parameters (`sets`, `line_bytes`) are taken on each call rather
//! than stored: the owning cache validates them once at construction, and a
//! tag-array entry stays two words wide.

/// One entry of a cache tag array: the tag and set index of a cacheline,
/// plus its valid and dirty state.
///
/// The default value is the invalid entry, which never matches any lookup,
/// so an empty or evicted way cannot produce a false hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineAddr {
    tag: u64,
    index: usize,
    valid: bool,
    dirty: bool,
}

impl LineAddr {
    /// Decomposes a raw byte address for a cache with `sets` sets of
    /// `line_bytes`-byte lines.
    ///
    /// `index = (raw >> log2(line_bytes)) & (sets - 1)` and
    /// `tag = (raw >> log2(line_bytes)) >> log2(sets)`. The result is valid
    /// and clean.
    ///
    /// Both `sets` and `line_bytes` must be powers of two; the owning
    /// cache's constructor guarantees this, so it is not re-checked here.
    #[inline]
    pub fn from_raw(raw: u64, sets: usize, line_bytes: usize) -> Self {
        let stripped = raw >> line_bytes.trailing_zeros();
        Self {
            tag: stripped >> sets.trailing_zeros(),
            index: (stripped & (sets as u64 - 1)) as usize,
            valid: true,
            dirty: false,
        }
    }

    /// Reconstructs the raw address of the first byte of this line.
    ///
    /// Inverse of [`from_raw`](Self::from_raw) up to line alignment:
    /// `addr.to_raw(..) == raw & !(line_bytes - 1)` for the `raw` the entry
    /// was decomposed from.
    #[inline]
    pub fn to_raw(&self, sets: usize, line_bytes: usize) -> u64 {
        ((self.tag << sets.trailing_zeros()) | self.index as u64)
            << line_bytes.trailing_zeros()
    }

    /// Steps to the next sequential cacheline.
    ///
    /// The set index wraps past `sets - 1` and carries into the tag, so a
    /// walk visits lines in ascending address order across set boundaries.
    #[inline]
    pub fn advance_line(&mut self, sets: usize) {
        self.index += 1;
        if self.index == sets {
            self.index = 0;
            self.tag += 1;
        }
    }

    /// Tag match: true only when both entries are valid and their tags are
    /// equal. An invalid entry matches nothing, itself included.
    #[inline]
    pub fn matches(&self, other: &Self) -> bool {
        self.valid && other.valid && self.tag == other.tag
    }

    /// The tag bits of this line.
    #[inline]
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// The set index of this line.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this entry holds a live line.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Marks the entry invalid (its way becomes a cold slot).
    #[inline]
    pub fn set_invalid(&mut self) {
        self.valid = false;
    }

    /// Whether the line has been written since fill or last clean.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the line dirty.
    #[inline]
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Marks the line clean.
    #[inline]
    pub fn set_clean(&mut self) {
        self.dirty = false;
    }
}

/// Iterator over every cacheline-aligned line covering `[addr, addr + bytes)`,
/// in ascending address order.
///
/// Each line is yielded exactly once; an empty range yields nothing. The walk
/// steps via [`LineAddr::advance_line`], so crossing the last set index
/// carries into the tag rather than re-decomposing raw addresses.
#[derive(Clone, Debug)]
pub struct LineWalk {
    cur: LineAddr,
    remaining: u64,
    sets: usize,
}

impl LineWalk {
    /// Creates a walk over the lines covering `[addr, addr + bytes)` under
    /// the given geometry.
    pub fn new(addr: u64, bytes: u64, sets: usize, line_bytes: usize) -> Self {
        let lg_line = line_bytes.trailing_zeros();
        let remaining = if bytes == 0 {
            0
        } else {
            ((addr + bytes - 1) >> lg_line) - (addr >> lg_line) + 1
        };
        Self {
            cur: LineAddr::from_raw(addr, sets, line_bytes),
            remaining,
            sets,
        }
    }
}

impl Iterator for LineWalk {
    type Item = LineAddr;

    fn next(&mut self) -> Option<LineAddr> {
        if self.remaining == 0 {
            return None;
        }
        let line = self.cur;
        self.cur.advance_line(self.sets);
        self.remaining -= 1;
        Some(line)
    }
}
