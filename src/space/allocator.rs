//! Per-peer bookkeeping of owned and free addresses.

use super::range_set::RangeSet;
use crate::error::SpaceError;
use crate::models::{add, Address, Cidr, Offset, Range};
use itertools::Itertools;
use std::fmt;

/// The address space assigned to one peer, split into addresses handed out
/// to containers (`owned`) and addresses still available (`free`).
///
/// An address is never in both sets. An address in neither was donated away
/// or never assigned. There is no internal locking: callers serialize access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Space {
    owned: RangeSet,
    free: RangeSet,
}

impl Space {
    pub fn new() -> Space {
        Space::default()
    }

    /// Addresses currently allocated.
    pub fn owned_set(&self) -> &RangeSet {
        &self.owned
    }

    /// Addresses available for allocation.
    pub fn free_set(&self) -> &RangeSet {
        &self.free
    }

    /// Add `[start, start + size)` as free space.
    pub fn add(&mut self, start: Address, size: Offset) {
        log::debug!("space: add {}", Range::new(start, size));
        self.free.add(start, add(start, size));
        self.assert_invariants();
    }

    /// Forget everything. Used on peer shutdown.
    pub fn clear(&mut self) {
        log::debug!("space: clear");
        self.owned.clear();
        self.free.clear();
    }

    /// Claim the lowest free address in `r`, or `None` if `r` has no free
    /// address.
    pub fn allocate(&mut self, r: Range) -> Option<Address> {
        let addr = self.free.ranges_within(r).next()?.start;
        self.take(addr);
        log::debug!("space: allocated {addr} from {r}");
        Some(addr)
    }

    /// Claim a specific free address.
    pub fn claim(&mut self, addr: Address) -> Result<(), SpaceError> {
        if !self.free.contains(addr) {
            return Err(SpaceError::NotFree(addr));
        }
        self.take(addr);
        log::debug!("space: claimed {addr}");
        Ok(())
    }

    /// Return an allocated address to the free set.
    ///
    /// A double free reports [`SpaceError::AlreadyFree`]; an address this
    /// peer does not hold at all reports [`SpaceError::NotOwned`].
    pub fn free(&mut self, addr: Address) -> Result<(), SpaceError> {
        if self.free.contains(addr) {
            return Err(SpaceError::AlreadyFree(addr));
        }
        if !self.owned.contains(addr) {
            return Err(SpaceError::NotOwned(addr));
        }
        self.owned.subtract(addr, add(addr, 1));
        self.free.add(addr, add(addr, 1));
        self.assert_invariants();
        log::debug!("space: freed {addr}");
        Ok(())
    }

    fn take(&mut self, addr: Address) {
        self.owned.add(addr, add(addr, 1));
        self.free.subtract(addr, add(addr, 1));
        self.assert_invariants();
    }

    pub fn is_owned(&self, addr: Address) -> bool {
        self.owned.contains(addr)
    }

    pub fn contains_free(&self, addr: Address) -> bool {
        self.free.contains(addr)
    }

    pub fn num_free_addresses_in_range(&self, r: Range) -> Offset {
        self.free.ranges_within(r).map(|chunk| chunk.size()).sum()
    }

    /// True if no address in `r` is allocated or missing.
    pub fn is_free(&self, r: Range) -> bool {
        r.size() == self.num_free_addresses_in_range(r)
    }

    /// True if `r` has no free address.
    pub fn is_full(&self, r: Range) -> bool {
        self.num_free_addresses_in_range(r) == 0
    }

    /// Largest contiguous free chunk within `r`. On ties the last one wins.
    pub fn biggest_free_range(&self, r: Range) -> Option<Range> {
        self.free
            .ranges_within(r)
            .fold(None, |biggest: Option<Range>, chunk| match biggest {
                Some(b) if b.size() > chunk.size() => Some(b),
                _ => Some(chunk),
            })
    }

    /// Largest single CIDR block lying in free space within `r`. On ties the
    /// last one wins.
    pub fn biggest_free_cidr(&self, r: Range) -> Option<Cidr> {
        self.free
            .ranges_within(r)
            .flat_map(|chunk| chunk.cidrs())
            .fold(None, |biggest: Option<Cidr>, cidr| match biggest {
                Some(b) if b.size() > cidr.size() => Some(b),
                _ => Some(cidr),
            })
    }

    /// Drop `r` from both sets.
    pub(super) fn remove(&mut self, r: Range) {
        self.owned.subtract_range(r);
        self.free.subtract_range(r);
        self.assert_invariants();
    }

    fn everything(&self) -> RangeSet {
        let mut everything = self.owned.clone();
        everything.union(&self.free);
        everything
    }

    /// Everything this peer holds, owned or free, as maximal ranges in
    /// ascending order.
    pub fn owned_ranges(&self) -> Vec<Range> {
        self.everything().ranges().collect()
    }

    /// Add all of `ranges` as free space.
    pub fn add_ranges(&mut self, ranges: &[Range]) {
        for r in ranges {
            self.free.add_range(*r);
        }
        log::debug!("space: added {} range(s)", ranges.len());
        self.assert_invariants();
    }

    /// Treat `ranges` as everything this peer should hold and add the part not
    /// already tracked as free space. Never removes anything.
    pub fn update_ranges(&mut self, ranges: &[Range]) {
        let mut fresh: RangeSet = ranges.iter().copied().collect();
        fresh.difference(&self.everything());
        if !fresh.is_empty() {
            log::debug!("space: {} new address(es) from update", fresh.len());
        }
        self.free.union(&fresh);
        self.assert_invariants();
    }

    pub(super) fn assert_invariants(&self) {
        debug_assert!(
            self.owned.is_well_formed(),
            "owned boundary list is corrupt: {:?}",
            self.owned
        );
        debug_assert!(
            self.free.is_well_formed(),
            "free boundary list is corrupt: {:?}",
            self.free
        );
        debug_assert!(
            !self.owned.intersects(&self.free),
            "owned and free overlap: {self}"
        );
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = |set: &RangeSet| {
            set.ranges()
                .map(|r| format!("{}+{}", r.start, r.size()))
                .join(" ")
        };
        match (self.owned.is_empty(), self.free.is_empty()) {
            (true, true) => write!(f, "No address ranges owned"),
            (false, true) => write!(f, "owned: {}", dump(&self.owned)),
            (true, false) => write!(f, "free: {}", dump(&self.free)),
            (false, false) => write!(
                f,
                "owned: {} free: {}",
                dump(&self.owned),
                dump(&self.free)
            ),
        }
    }
}
