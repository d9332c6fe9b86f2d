//! Address space allocator for a single peer.
//!
//! - [`range_set`] - boundary-list set of addresses shared by every mutation
//! - [`allocator`] - the owned/free partition and single-address operations
//! - [`donation`] - picking space to give away during rebalancing

mod allocator;
mod donation;
mod range_set;

// Re-export public types
pub use allocator::Space;
pub use donation::OwnedCidrs;
pub use range_set::RangeSet;
