//! JSON snapshot of the ranges a peer holds.
//!
//! The core keeps nothing on disk. A coordinator wanting durability stores
//! this snapshot wherever it likes and feeds it back through
//! [`Space::add_ranges`] on restart.

use crate::models::Range;
use crate::space::Space;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub owned_ranges: Vec<Range>,
}

impl Snapshot {
    pub fn of(space: &Space) -> Snapshot {
        Snapshot {
            owned_ranges: space.owned_ranges(),
        }
    }
}

/// Serialize [`Space::owned_ranges`] as pretty printed JSON.
pub fn owned_ranges_json(space: &Space) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Snapshot::of(space))
}

/// Read back the ranges of a snapshot produced by [`owned_ranges_json`].
pub fn restore_ranges(json: &str) -> Result<Vec<Range>, serde_json::Error> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    log::debug!("restored {} range(s) from snapshot", snapshot.owned_ranges.len());
    Ok(snapshot.owned_ranges)
}
