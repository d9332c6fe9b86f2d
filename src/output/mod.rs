//! Human and machine readable views of a [`crate::space::Space`].
//!
//! - [`terminal`] - coloured per-range report for diagnostics
//! - [`snapshot`] - JSON snapshot of the owned ranges

mod snapshot;
mod terminal;

pub use snapshot::{owned_ranges_json, restore_ranges, Snapshot};
pub use terminal::{format_field, print_space, space_report};
