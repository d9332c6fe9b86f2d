//! Half-open address ranges and their minimal CIDR decomposition.

use super::address::{add, subtract, Address, Offset};
use super::cidr::{Cidr, MAX_LENGTH};
use crate::error::AddressError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Addresses `[start, end)`, with `start <= end`.
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Default, Serialize, Deserialize,
)]
pub struct Range {
    /// First address in the range.
    pub start: Address,
    /// First address after the range.
    pub end: Address,
}

lazy_static! {
    static ref RANGE_RE: Regex =
        Regex::new(r"^\s*([^\s-]+)\s*-\s*([^\s-]+)\s*$").expect("Invalid Regex?");
}

impl Range {
    pub fn new(start: Address, size: Offset) -> Range {
        Range {
            start,
            end: add(start, size),
        }
    }

    pub fn size(&self) -> Offset {
        subtract(self.end, self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        !(self.start >= other.end || self.end <= other.start)
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end
    }

    /// True when the range is exactly one aligned CIDR block.
    ///
    /// Scans masks from most to least specific looking for one where `start`
    /// has only zero bits and `end - 1` only one bits below it.
    pub fn is_cidr(&self) -> bool {
        let (start, end) = (self.start.0, self.end.0.wrapping_sub(1));
        let mut mask = u32::MAX;
        while mask != 0 {
            if mask & start == start && (!mask | start) == end {
                return true;
            }
            mask <<= 1;
        }
        false
    }

    /// `a.b.c.d/n` when the range is a single block, otherwise the
    /// `first-last` form.
    pub fn as_cidr_string(&self) -> String {
        if !self.is_cidr() {
            return self.to_string();
        }
        let size = self.end.0.wrapping_sub(self.start.0);
        let prefix_len = MAX_LENGTH - size.trailing_zeros() as u8;
        Cidr {
            addr: self.start,
            prefix_len,
        }
        .to_string()
    }

    /// Minimal ordered list of CIDR blocks whose union is exactly this range.
    ///
    /// Greedy: from the current start, keep doubling the block while the start
    /// stays aligned and the block stays inside the range, emit it, move on.
    pub fn cidrs(&self) -> Vec<Cidr> {
        let mut cidrs = Vec::new();
        if self.is_empty() {
            return cidrs;
        }
        let (mut start, end) = (self.start.0, self.end.0.wrapping_sub(1));

        while end >= start {
            let mut mask = u32::MAX;
            let mut prefix_len = MAX_LENGTH;
            while mask > 0 {
                let wider = mask << 1;
                if start & wider != start || (start | !wider) > end {
                    break;
                }
                mask = wider;
                prefix_len -= 1;
            }
            cidrs.push(Cidr {
                addr: Address(start),
                prefix_len,
            });
            start |= !mask;
            // the block reached 255.255.255.255
            match start.checked_add(1) {
                Some(next) => start = next,
                None => break,
            }
        }
        cidrs
    }
}

impl fmt::Display for Range {
    /// Inclusive `first-last` form.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, Address(self.end.0.wrapping_sub(1)))
    }
}

impl FromStr for Range {
    type Err = AddressError;

    /// Parse the inclusive `first-last` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RANGE_RE
            .captures(s)
            .ok_or_else(|| AddressError::InvalidRange(s.trim().to_string()))?;
        let first = Address::from_str(&caps[1])?;
        let last = Address::from_str(&caps[2])?;
        if last < first {
            return Err(AddressError::InvalidRange(s.trim().to_string()));
        }
        let end = last
            .0
            .checked_add(1)
            .ok_or_else(|| AddressError::InvalidRange(s.trim().to_string()))?;
        Ok(Range {
            start: first,
            end: Address(end),
        })
    }
}
