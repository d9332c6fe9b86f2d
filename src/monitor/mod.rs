//! Notifying collaborators when the ranges a peer owns change.
//!
//! The coordinator calls [`RangeMonitor::handle_update`] with the previous and
//! current result of [`crate::space::Space::owned_ranges`].
//! - [`groups`] - clustering old and new ranges by overlap
//! - [`delta`] - address-level and route-level differences
//! - [`route_table`] - applying route differences to an external table

mod delta;
mod groups;
mod route_table;

use crate::models::Range;

// Re-export public types
pub use delta::{RangeDelta, RoutePlan};
pub use groups::{group_ranges, RangeGroup};
pub use route_table::{RouteFailure, RouteOp, RouteTable, RouteTableMonitor, UpdateReport};

/// Receives every change to the set of ranges a peer owns. Both lists are
/// sorted and non-overlapping.
pub trait RangeMonitor {
    fn handle_update(&mut self, old: &[Range], new: &[Range]) -> UpdateReport;
}

/// Monitor for deployments without an external route table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMonitor;

impl RangeMonitor for NullMonitor {
    fn handle_update(&mut self, _old: &[Range], _new: &[Range]) -> UpdateReport {
        UpdateReport::default()
    }
}
