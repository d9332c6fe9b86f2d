//! Choosing which part of a peer's free space to give to another peer.
//!
//! Cloud route tables cap the number of entries, so in CIDR-aligned mode the
//! search prefers donations that split as few blocks as possible:
//!
//! 1. If any of the peer's blocks is entirely free, donate the second half of
//!    the biggest one.
//! 2. Otherwise halve every block, breadth first. The first half found to be
//!    entirely free is donated. Halves that still have some free address are
//!    halved again in the next round, full halves are dropped.

use super::allocator::Space;
use crate::models::{add, Cidr, Range};

/// Supplies the CIDR blocks the ownership protocol currently attributes to
/// the local peer. Only consulted for CIDR-aligned donations.
pub trait OwnedCidrs {
    fn owned_cidrs(&self) -> Vec<Cidr>;
}

impl OwnedCidrs for [Cidr] {
    fn owned_cidrs(&self) -> Vec<Cidr> {
        self.to_vec()
    }
}

impl<const N: usize> OwnedCidrs for [Cidr; N] {
    fn owned_cidrs(&self) -> Vec<Cidr> {
        self.to_vec()
    }
}

impl OwnedCidrs for Vec<Cidr> {
    fn owned_cidrs(&self) -> Vec<Cidr> {
        self.clone()
    }
}

impl Space {
    /// Pick a range to hand to another peer and stop tracking it.
    ///
    /// Without CIDR alignment this is the upper half (rounded up) of the
    /// biggest free chunk within `r`. With CIDR alignment `r` is ignored and
    /// the blocks from `owned` are searched instead. Returns `None` when
    /// nothing can be donated.
    pub fn donate<O>(&mut self, r: Range, is_cidr_aligned: bool, owned: &O) -> Option<Range>
    where
        O: OwnedCidrs + ?Sized,
    {
        let chunk = if is_cidr_aligned {
            self.find_cidr_donation(owned.owned_cidrs())
        } else {
            self.find_non_cidr_donation(r)
        };

        match chunk {
            Some(chunk) => {
                log::info!(
                    "space: donating {} ({} addresses)",
                    chunk.as_cidr_string(),
                    chunk.size()
                );
                self.remove(chunk);
                Some(chunk)
            }
            None => {
                log::debug!("space: nothing to donate (cidr aligned: {is_cidr_aligned})");
                None
            }
        }
    }

    fn find_non_cidr_donation(&self, r: Range) -> Option<Range> {
        let mut biggest = self.biggest_free_range(r)?;
        // size / 2 rounds down, so the donated half rounds up and is never empty
        biggest.start = add(biggest.start, biggest.size() / 2);
        Some(biggest)
    }

    fn find_cidr_donation(&self, cidrs: Vec<Cidr>) -> Option<Range> {
        let biggest_free = cidrs
            .iter()
            .copied()
            .filter(|cidr| self.is_free(cidr.range()))
            .reduce(|biggest, cidr| {
                if biggest.size() < cidr.size() {
                    cidr
                } else {
                    biggest
                }
            });
        if let Some(biggest) = biggest_free {
            let donation = match biggest.halve() {
                Ok((_, second)) => second,
                Err(_) => biggest,
            };
            return Some(donation.range());
        }

        let mut candidates = cidrs;
        while !candidates.is_empty() {
            let mut next = Vec::new();
            for cidr in candidates {
                let Ok((first, second)) = cidr.halve() else {
                    if self.is_free(cidr.range()) {
                        unreachable!("free /32 block {cidr} should have been donated already");
                    }
                    continue;
                };
                if self.is_free(first.range()) {
                    return Some(first.range());
                }
                if self.is_free(second.range()) {
                    return Some(second.range());
                }
                if !self.is_full(first.range()) {
                    next.push(first);
                }
                if !self.is_full(second.range()) {
                    next.push(second);
                }
            }
            candidates = next;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Offset};

    fn ip(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    fn range(first: &str, size: Offset) -> Range {
        Range::new(ip(first), size)
    }

    fn no_cidrs() -> Vec<Cidr> {
        Vec::new()
    }

    #[test]
    fn test_donate_second_half_of_only_free_block() {
        let block = cidr("10.0.0.0/24").range();
        let mut space = Space::new();
        space.add_ranges(&[block]);

        let donated = space.donate(block, false, &no_cidrs()).unwrap();
        assert_eq!(donated, range("10.0.0.128", 128));
        assert_eq!(donated.to_string(), "10.0.0.128-10.0.0.255");
        assert_eq!(space.owned_ranges(), vec![range("10.0.0.0", 128)]);
        assert!(space.is_full(donated));
        assert!(!space.is_owned(ip("10.0.0.200")));
    }

    #[test]
    fn test_donate_odd_size_rounds_up() {
        let mut space = Space::new();
        space.add(ip("10.0.0.0"), 5);
        let donated = space.donate(range("10.0.0.0", 5), false, &no_cidrs()).unwrap();
        assert_eq!(donated, range("10.0.0.2", 3));

        let mut space = Space::new();
        space.add(ip("10.0.0.0"), 1);
        let donated = space.donate(range("10.0.0.0", 1), false, &no_cidrs()).unwrap();
        assert_eq!(donated, range("10.0.0.0", 1));
        assert_eq!(space.to_string(), "No address ranges owned");
    }

    #[test]
    fn test_donate_picks_biggest_free_chunk() {
        let mut space = Space::new();
        space.add(ip("10.0.0.0"), 32);
        space.claim(ip("10.0.0.8")).unwrap();
        // free chunks: .0-.7 (8) and .9-.31 (23)
        let donated = space.donate(range("10.0.0.0", 32), false, &no_cidrs()).unwrap();
        assert_eq!(donated, range("10.0.0.20", 12));
        assert!(space.is_owned(ip("10.0.0.8")), "allocated address untouched");
    }

    #[test]
    fn test_donate_nothing_free() {
        let mut space = Space::new();
        space.add(ip("10.0.0.0"), 2);
        space.claim(ip("10.0.0.0")).unwrap();
        space.claim(ip("10.0.0.1")).unwrap();
        let before = space.clone();
        assert_eq!(space.donate(range("10.0.0.0", 2), false, &no_cidrs()), None);
        assert_eq!(space, before);
        assert_eq!(Space::new().donate(range("10.0.0.0", 2), false, &no_cidrs()), None);
    }

    #[test]
    fn test_cidr_donation_halves_biggest_free_block() {
        let mut space = Space::new();
        space.add_ranges(&[cidr("10.0.0.0/24").range(), cidr("10.0.4.0/22").range()]);
        let owned = [cidr("10.0.0.0/24"), cidr("10.0.4.0/22")];

        let donated = space.donate(Range::default(), true, &owned).unwrap();
        assert_eq!(donated, cidr("10.0.6.0/23").range());
        assert_eq!(
            space.owned_ranges(),
            vec![cidr("10.0.0.0/24").range(), cidr("10.0.4.0/23").range()]
        );
    }

    #[test]
    fn test_cidr_donation_first_of_equal_blocks() {
        let mut space = Space::new();
        space.add_ranges(&[cidr("10.0.0.0/24").range(), cidr("10.0.1.0/24").range()]);
        let owned = vec![cidr("10.0.1.0/24"), cidr("10.0.0.0/24")];

        let donated = space.donate(Range::default(), true, &owned).unwrap();
        assert_eq!(donated, cidr("10.0.1.128/25").range());
    }

    #[test]
    fn test_cidr_donation_free_single_address_block() {
        let mut space = Space::new();
        space.add(ip("10.0.0.7"), 1);
        let donated = space
            .donate(Range::default(), true, &[cidr("10.0.0.7/32")])
            .unwrap();
        assert_eq!(donated, range("10.0.0.7", 1));
    }

    #[test]
    fn test_cidr_donation_splits_partially_used_block() {
        let block = cidr("10.0.0.0/24");
        let mut space = Space::new();
        space.add_ranges(&[block.range()]);
        space.claim(ip("10.0.0.1")).unwrap();

        // /24 is not free, its second half /25 is
        let donated = space.donate(Range::default(), true, &[block]).unwrap();
        assert_eq!(donated, cidr("10.0.0.128/25").range());

        // next round: 10.0.0.0/25 has .1 claimed, so 10.0.0.64/26 goes
        let donated = space.donate(Range::default(), true, &[block]).unwrap();
        assert_eq!(donated, cidr("10.0.0.64/26").range());
    }

    #[test]
    fn test_cidr_donation_descends_several_rounds() {
        let block = cidr("10.0.0.0/29");
        let mut space = Space::new();
        space.add_ranges(&[block.range()]);
        for last in [0, 1, 2, 4, 5, 6] {
            space.claim(Address::new(10, 0, 0, last)).unwrap();
        }
        // free: .3 and .7; each half of every split is partly used until /32
        let donated = space.donate(Range::default(), true, &[block]).unwrap();
        assert_eq!(donated, cidr("10.0.0.3/32").range());
        assert!(space.is_owned(ip("10.0.0.2")));
        assert!(space.contains_free(ip("10.0.0.7")));
    }

    #[test]
    fn test_cidr_donation_full_blocks() {
        let block = cidr("10.0.0.0/30");
        let mut space = Space::new();
        space.add_ranges(&[block.range()]);
        let r = block.range();
        while space.allocate(r).is_some() {}
        assert_eq!(space.donate(Range::default(), true, &[block]), None);
        assert_eq!(space.donate(Range::default(), true, &no_cidrs()), None);
        // unknown block with nothing tracked
        assert_eq!(
            space.donate(Range::default(), true, &[cidr("192.168.0.0/24")]),
            None
        );
    }
}
