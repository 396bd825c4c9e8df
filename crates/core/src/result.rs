//! Allocation result representation.

use crate::bin::Bin;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Residual demand of a shipment that no bin admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnfitRecord {
    /// Shipment name.
    pub name: String,
    /// Units left over.
    pub quantity: usize,
}

impl UnfitRecord {
    /// Creates a new record.
    pub fn new(name: impl Into<String>, quantity: usize) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Outcome of an allocation run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocationResult {
    /// Final bin states, in input order.
    pub bins: Vec<Bin>,

    /// Residual demand, in processing order.
    pub unfit: Vec<UnfitRecord>,

    /// Number of unit commits performed.
    pub placements: usize,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Whether the run was stopped before the input was exhausted.
    pub cancelled: bool,

    /// Whether the stop was caused by the time limit.
    pub timed_out: bool,
}

impl AllocationResult {
    /// Creates a result for the given final state.
    pub fn new(bins: Vec<Bin>, unfit: Vec<UnfitRecord>) -> Self {
        let placements = bins.iter().map(|b| b.items().len()).sum();
        Self {
            bins,
            unfit,
            placements,
            computation_time_ms: 0,
            cancelled: false,
            timed_out: false,
        }
    }

    /// Returns true if every unit found a bin.
    pub fn all_placed(&self) -> bool {
        self.unfit.is_empty()
    }

    /// Returns the number of placed units.
    pub fn placed_count(&self) -> usize {
        self.placements
    }

    /// Returns the number of shipment records with residual demand.
    pub fn unfit_count(&self) -> usize {
        self.unfit.len()
    }

    /// Returns the total number of residual units.
    pub fn unfit_quantity(&self) -> usize {
        self.unfit
            .iter()
            .fold(0usize, |total, u| total.saturating_add(u.quantity))
    }

    /// Number of bins that received at least one unit.
    pub fn bins_used(&self) -> usize {
        self.bins.iter().filter(|b| !b.is_empty()).count()
    }

    /// Units of the named shipment placed across all bins.
    pub fn placed_units_of(&self, name: &str) -> usize {
        self.bins.iter().map(|b| b.placed_count(name)).sum()
    }

    /// Looks up a bin by name. Returns the first match.
    pub fn bin(&self, name: &str) -> Option<&Bin> {
        self.bins.iter().find(|b| b.name() == name)
    }

    /// Returns true if the run covered all of its input.
    pub fn completed_normally(&self) -> bool {
        !self.cancelled
    }

    /// Computes summary statistics.
    pub fn summary(&self) -> AllocationSummary {
        AllocationSummary::from(self)
    }
}

/// Summary statistics for an allocation result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocationSummary {
    /// Units requested (placed plus unfit).
    pub total_requested: usize,
    /// Units placed.
    pub total_placed: usize,
    /// Units left unfit.
    pub total_unfit: usize,
    /// Bins that received at least one unit.
    pub bins_used: usize,
    /// Committed weight over the capacity of the bins used, in percent.
    pub weight_utilization_percent: f64,
    /// Placed unit volume over the volume of the bins used, in percent.
    pub volume_utilization_percent: f64,
    /// Computation time in milliseconds.
    pub time_ms: u64,
}

impl From<&AllocationResult> for AllocationSummary {
    fn from(result: &AllocationResult) -> Self {
        let used: Vec<&Bin> = result.bins.iter().filter(|b| !b.is_empty()).collect();

        let capacity: f64 = used.iter().map(|b| b.max_weight()).sum();
        let committed: f64 = used.iter().map(|b| b.current_weight()).sum();
        let volume: f64 = used.iter().map(|b| b.volume()).sum();
        let filled: f64 = used.iter().map(|b| b.filled_volume()).sum();

        Self {
            total_requested: result.placements.saturating_add(result.unfit_quantity()),
            total_placed: result.placements,
            total_unfit: result.unfit_quantity(),
            bins_used: used.len(),
            weight_utilization_percent: percent(committed, capacity),
            volume_utilization_percent: percent(filled, volume),
            time_ms: result.computation_time_ms,
        }
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
