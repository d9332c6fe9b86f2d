//! Grouping of old and new range lists by overlap.

use crate::models::Range;

/// Old ranges and the new ranges overlapping them. Either side may be empty
/// when a range appeared or disappeared without overlapping anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeGroup {
    pub old: Vec<Range>,
    pub new: Vec<Range>,
}

impl RangeGroup {
    fn old_only(old: &[Range]) -> RangeGroup {
        RangeGroup {
            old: old.to_vec(),
            new: Vec::new(),
        }
    }

    fn new_only(new: &[Range]) -> RangeGroup {
        RangeGroup {
            old: Vec::new(),
            new: new.to_vec(),
        }
    }
}

/// Group two sorted, non-overlapping range lists into clusters of mutually
/// overlapping ranges. Ranges present unchanged in both lists are dropped.
/// Trailing ranges of either list end up in a single one-sided group.
pub fn group_ranges(old: &[Range], new: &[Range]) -> Vec<RangeGroup> {
    let mut groups = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut from_i, mut from_j) = (0, 0);
    let mut overlapped = false;

    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            i += 1;
            j += 1;
        } else if old[i].overlaps(&new[j]) {
            if !overlapped {
                from_i = i;
                from_j = j;
            }
            overlapped = true;
            // advance whichever range ends first
            if old[i].end >= new[j].end {
                j += 1;
            } else {
                i += 1;
            }
        } else {
            if overlapped {
                // step back onto the last range of the cluster
                if old[i].end < new[j].end {
                    j -= 1;
                } else {
                    i -= 1;
                }
                groups.push(RangeGroup {
                    old: old[from_i..=i].to_vec(),
                    new: new[from_j..=j].to_vec(),
                });
                i += 1;
                j += 1;
            } else if old[i].end < new[j].end {
                groups.push(RangeGroup::old_only(&old[i..=i]));
                i += 1;
            } else {
                groups.push(RangeGroup::new_only(&new[j..=j]));
                j += 1;
            }
            overlapped = false;
        }
    }

    if overlapped {
        if i == old.len() {
            i -= 1;
        } else {
            j -= 1;
        }
        groups.push(RangeGroup {
            old: old[from_i..=i].to_vec(),
            new: new[from_j..=j].to_vec(),
        });
        i += 1;
        j += 1;
    }

    if i < old.len() {
        groups.push(RangeGroup::old_only(&old[i..]));
    }
    if j < new.len() {
        groups.push(RangeGroup::new_only(&new[j..]));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    /// `[first, last)` within 10.0.0.0/16, by offset.
    fn r(first: u32, last: u32) -> Range {
        let base = Address::new(10, 0, 0, 0).0;
        Range {
            start: Address(base + first),
            end: Address(base + last),
        }
    }

    #[test]
    fn test_group_ranges_no_changes() {
        let old = vec![r(0, 255)];
        assert!(group_ranges(&old, &old).is_empty());
        assert!(group_ranges(&[], &[]).is_empty());
    }

    #[test]
    fn test_group_ranges_single_gap() {
        let old = vec![r(0, 255)];
        let new = vec![r(0, 4), r(5, 255)];
        let groups = group_ranges(&old, &new);
        assert_eq!(groups, vec![RangeGroup { old, new }]);
    }

    #[test]
    fn test_group_ranges_gap_at_beginning() {
        let old = vec![r(0, 255)];
        let new = vec![r(5, 255)];
        assert_eq!(group_ranges(&old, &new), vec![RangeGroup { old, new }]);
    }

    #[test]
    fn test_group_ranges_gap_at_end() {
        let old = vec![r(0, 255)];
        let new = vec![r(0, 4)];
        assert_eq!(group_ranges(&old, &new), vec![RangeGroup { old, new }]);
    }

    #[test]
    fn test_group_ranges_one_sided() {
        assert_eq!(
            group_ranges(&[r(0, 8)], &[]),
            vec![RangeGroup::old_only(&[r(0, 8)])]
        );
        assert_eq!(
            group_ranges(&[], &[r(0, 8), r(16, 24)]),
            vec![RangeGroup::new_only(&[r(0, 8), r(16, 24)])]
        );
    }

    #[test]
    fn test_group_ranges() {
        let (r2, r4, r5, r6) = (r(0, 4), r(2, 8), r(6, 10), r(12, 16));
        let (r7, r8, r9, r10) = (r(18, 20), r(22, 24), r(26, 30), r(28, 32));
        let r11 = r(256, 511);

        let old = vec![r2, r5, r7, r8, r9];
        let new = vec![r4, r6, r8, r10, r11];
        let groups = group_ranges(&old, &new);

        assert_eq!(
            groups,
            vec![
                RangeGroup {
                    old: vec![r2, r5],
                    new: vec![r4]
                },
                RangeGroup::new_only(&[r6]),
                RangeGroup::old_only(&[r7]),
                RangeGroup {
                    old: vec![r9],
                    new: vec![r10]
                },
                RangeGroup::new_only(&[r11]),
            ]
        );
    }
}
