//! Records emitted while an allocation is in progress.

use crate::bin::Bin;
use crate::rotation::RotationType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Describes one unit commit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementEvent {
    /// 1-based commit counter within the run.
    pub sequence: usize,

    /// Position of the receiving bin in the input bin list.
    pub bin_index: usize,

    /// Name of the receiving bin.
    pub bin_name: String,

    /// Name of the shipment the unit came from.
    pub shipment_name: String,

    /// Rotation mode of that shipment.
    pub rotation: RotationType,

    /// Units of the shipment still outstanding after this commit.
    pub remaining: usize,
}

/// Full bin-list state captured right after a unit commit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// The commit that produced this state.
    pub event: PlacementEvent,

    /// Every bin, in input order.
    pub bins: Vec<Bin>,
}

impl Snapshot {
    /// Total units placed across all bins.
    pub fn placed_units(&self) -> usize {
        self.bins.iter().map(|b| b.items().len()).sum()
    }

    /// Returns the bin that received the unit.
    pub fn target_bin(&self) -> Option<&Bin> {
        self.bins.get(self.event.bin_index)
    }
}
