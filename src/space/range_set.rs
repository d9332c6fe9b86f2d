//! Boundary-list representation of a set of addresses.

use crate::models::{Address, Range};
use itertools::Itertools;

/// A set of addresses stored as a sorted list of boundaries.
///
/// Even positions are inclusive starts, odd positions exclusive ends. Ranges
/// never overlap and touching ranges are always coalesced, so the list is
/// strictly increasing with even length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet(Vec<Address>);

impl RangeSet {
    pub fn new() -> RangeSet {
        RangeSet(Vec::new())
    }

    /// The raw boundary list.
    pub fn boundaries(&self) -> &[Address] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Does the set contain `addr`?
    pub fn contains(&self, addr: Address) -> bool {
        first_greater(&self.0, addr) & 1 != 0
    }

    /// Union `[start, end)` into the set.
    pub fn add(&mut self, start: Address, end: Address) {
        self.add_sub(start, end, 0);
    }

    /// Remove `[start, end)` from the set.
    pub fn subtract(&mut self, start: Address, end: Address) {
        self.add_sub(start, end, 1);
    }

    pub fn add_range(&mut self, r: Range) {
        self.add(r.start, r.end);
    }

    pub fn subtract_range(&mut self, r: Range) {
        self.subtract(r.start, r.end);
    }

    /// Union every range of `other` into the set.
    pub fn union(&mut self, other: &RangeSet) {
        for r in other.ranges() {
            self.add_range(r);
        }
    }

    /// Remove every range of `other` from the set.
    pub fn difference(&mut self, other: &RangeSet) {
        for r in other.ranges() {
            self.subtract_range(r);
        }
    }

    /// Maximal ranges of the set in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = Range> + '_ {
        self.0
            .iter()
            .tuples()
            .map(|(&start, &end)| Range { start, end })
    }

    /// The set's ranges clipped to `r`, in ascending order. Empty when `r` is.
    pub fn ranges_within(&self, r: Range) -> impl Iterator<Item = Range> + '_ {
        self.ranges()
            .filter(move |_| r.start < r.end)
            .skip_while(move |chunk| chunk.end <= r.start)
            .take_while(move |chunk| chunk.start < r.end)
            .map(move |chunk| Range {
                start: chunk.start.max(r.start),
                end: chunk.end.min(r.end),
            })
    }

    /// Total number of addresses in the set.
    pub fn len(&self) -> u64 {
        self.ranges().map(|r| r.size() as u64).sum()
    }

    /// True if some address belongs to both sets.
    pub fn intersects(&self, other: &RangeSet) -> bool {
        let (mut a, mut b) = (self.ranges().peekable(), other.ranges().peekable());
        while let (Some(x), Some(y)) = (a.peek(), b.peek()) {
            if x.overlaps(y) {
                return true;
            }
            if x.end <= y.end {
                a.next();
            } else {
                b.next();
            }
        }
        false
    }

    /// Strictly increasing and of even length.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() % 2 == 0 && self.0.windows(2).all(|w| w[0] < w[1])
    }

    /// Single splice implementing both union (`sense == 0`) and difference
    /// (`sense == 1`).
    ///
    /// Boundaries inside `[start, end]` are dropped. `start` and `end` become
    /// boundaries when their insertion position has the parity `sense`, i.e.
    /// when they fall outside (union) or inside (difference) an existing range.
    fn add_sub(&mut self, start: Address, end: Address, sense: usize) {
        assert!(start <= end, "range {start}..{end} has negative size");
        if start == end {
            return;
        }
        let start_pos = first_greater_or_eq(&self.0, start);
        let end_pos = first_greater(&self.0[start_pos..], end) + start_pos;

        let mut edges = Vec::with_capacity(2);
        if start_pos & 1 == sense {
            edges.push(start);
        }
        if end_pos & 1 == sense {
            edges.push(end);
        }
        self.0.splice(start_pos..end_pos, edges);
    }
}

impl FromIterator<Range> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        let mut set = RangeSet::new();
        for r in iter {
            set.add_range(r);
        }
        set
    }
}

fn first_greater(a: &[Address], x: Address) -> usize {
    a.partition_point(|&v| v <= x)
}

fn first_greater_or_eq(a: &[Address], x: Address) -> usize {
    a.partition_point(|&v| v < x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(n: u32) -> Address {
        Address(n)
    }

    fn set(bounds: &[u32]) -> RangeSet {
        RangeSet(bounds.iter().map(|&n| Address(n)).collect())
    }

    #[test]
    fn test_add_disjoint_and_coalesce() {
        let mut s = RangeSet::new();
        s.add(a(10), a(20));
        s.add(a(30), a(40));
        assert_eq!(s, set(&[10, 20, 30, 40]));

        // touching ranges merge
        s.add(a(20), a(30));
        assert_eq!(s, set(&[10, 40]));

        // overlapping on both sides
        s.add(a(5), a(50));
        assert_eq!(s, set(&[5, 50]));
        assert!(s.is_well_formed());
    }

    #[test]
    fn test_add_spanning_several_ranges() {
        let mut s = set(&[10, 20, 30, 40, 50, 60]);
        s.add(a(15), a(55));
        assert_eq!(s, set(&[10, 60]));

        let mut s = set(&[10, 20, 30, 40]);
        s.add(a(22), a(28));
        assert_eq!(s, set(&[10, 20, 22, 28, 30, 40]));
    }

    #[test]
    fn test_subtract() {
        let mut s = set(&[10, 40]);
        s.subtract(a(20), a(30));
        assert_eq!(s, set(&[10, 20, 30, 40]));

        // removing the gap edges merges nothing back
        s.subtract(a(10), a(20));
        assert_eq!(s, set(&[30, 40]));

        s.subtract(a(0), a(100));
        assert!(s.is_empty());

        let mut s = set(&[10, 20, 30, 40, 50, 60]);
        s.subtract(a(15), a(55));
        assert_eq!(s, set(&[10, 15, 55, 60]));
    }

    #[test]
    fn test_subtract_outside_is_noop() {
        let mut s = set(&[10, 20]);
        s.subtract(a(20), a(30));
        assert_eq!(s, set(&[10, 20]));
        s.subtract(a(0), a(10));
        assert_eq!(s, set(&[10, 20]));
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut s = set(&[10, 20]);
        s.add(a(30), a(30));
        s.subtract(a(15), a(15));
        assert_eq!(s, set(&[10, 20]));
    }

    #[test]
    #[should_panic(expected = "negative size")]
    fn test_backwards_range_panics() {
        let mut s = RangeSet::new();
        s.add(a(20), a(10));
    }

    #[test]
    fn test_contains() {
        let s = set(&[10, 20, 30, 40]);
        assert!(!s.contains(a(9)));
        assert!(s.contains(a(10)));
        assert!(s.contains(a(19)));
        assert!(!s.contains(a(20)));
        assert!(!s.contains(a(29)));
        assert!(s.contains(a(39)));
        assert!(!s.contains(a(40)));
    }

    #[test]
    fn test_ranges_within() {
        let s = set(&[10, 20, 30, 40, 50, 60]);
        let clipped: Vec<Range> = s
            .ranges_within(Range {
                start: a(15),
                end: a(35),
            })
            .collect();
        assert_eq!(
            clipped,
            vec![
                Range { start: a(15), end: a(20) },
                Range { start: a(30), end: a(35) }
            ]
        );
        assert_eq!(
            s.ranges_within(Range { start: a(20), end: a(30) }).count(),
            0
        );
        assert_eq!(
            s.ranges_within(Range { start: a(35), end: a(35) }).count(),
            0
        );
    }

    #[test]
    fn test_set_algebra() {
        let mut s = set(&[0, 10, 20, 30]);
        s.union(&set(&[5, 25]));
        assert_eq!(s, set(&[0, 30]));
        s.difference(&set(&[0, 5, 25, 30]));
        assert_eq!(s, set(&[5, 25]));
        assert_eq!(s.len(), 20);

        assert!(s.intersects(&set(&[24, 26])));
        assert!(!s.intersects(&set(&[0, 5, 25, 30])));
        assert!(!RangeSet::new().intersects(&s));
    }

    #[test]
    fn test_from_iterator() {
        let s: RangeSet = vec![
            Range { start: a(30), end: a(40) },
            Range { start: a(0), end: a(10) },
            Range { start: a(10), end: a(20) },
        ]
        .into_iter()
        .collect();
        assert_eq!(s, set(&[0, 20, 30, 40]));
    }
}
