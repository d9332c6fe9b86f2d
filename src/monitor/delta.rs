//! What changed between two snapshots of a peer's ranges.

use super::groups::group_ranges;
use crate::models::{Cidr, Range};
use crate::space::RangeSet;

/// Address-level difference between two range lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeDelta {
    /// Addresses in the new list only.
    pub added: Vec<Range>,
    /// Addresses in the old list only.
    pub removed: Vec<Range>,
}

impl RangeDelta {
    pub fn between(old: &[Range], new: &[Range]) -> RangeDelta {
        let old_set: RangeSet = old.iter().copied().collect();
        let new_set: RangeSet = new.iter().copied().collect();

        let mut added = new_set.clone();
        added.difference(&old_set);
        let mut removed = old_set;
        removed.difference(&new_set);

        RangeDelta {
            added: added.ranges().collect(),
            removed: removed.ranges().collect(),
        }
    }

    pub fn added_addresses(&self) -> u64 {
        self.added.iter().map(|r| r.size() as u64).sum()
    }

    pub fn removed_addresses(&self) -> u64 {
        self.removed.iter().map(|r| r.size() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Route entries to create and delete so a route table that held the CIDRs
/// of the old ranges ends up holding the CIDRs of the new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePlan {
    pub create: Vec<Cidr>,
    pub delete: Vec<Cidr>,
}

impl RoutePlan {
    /// Compare each group of overlapping ranges by its CIDR decomposition.
    /// Blocks present on both sides of a group are left alone.
    pub fn between(old: &[Range], new: &[Range]) -> RoutePlan {
        let mut plan = RoutePlan::default();
        for group in group_ranges(old, new) {
            let old_cidrs: Vec<Cidr> = group.old.iter().flat_map(|r| r.cidrs()).collect();
            let new_cidrs: Vec<Cidr> = group.new.iter().flat_map(|r| r.cidrs()).collect();

            plan.create.extend(new_cidrs.iter().filter(|c| !old_cidrs.contains(c)));
            plan.delete.extend(old_cidrs.iter().filter(|c| !new_cidrs.contains(c)));
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty()
    }
}
